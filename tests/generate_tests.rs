#[cfg(test)]
mod generate_tests {
    use std::io::Write;
    use std::net::Ipv4Addr;
    use tempfile::{NamedTempFile, TempDir};

    use lazykube::cluster::{build_cluster, NodeRole};
    use lazykube::config_loader::load_config;
    use lazykube::ip::{AddressPool, Network, PoolError, PoolSpecError};
    use lazykube::orchestrator::{build_network, generate};

    const CONFIG: &str = r#"
general:
  version: "1632.3.0"
  channel: stable
  domain_base: k8s.local
  keys: ["ssh-rsa AAAA test"]
matchbox:
  url: http://matchbox.k8s.local:8080
  ip: 172.17.0.2
  domain: matchbox.k8s.local
network:
  gateway: 172.17.0.254
  ips: ["172.17.0.0/24:172.17.0.21", "not a pool", "10.10.0.0/24:10.10.0.21"]
  dns: [8.8.8.8]
  vip: 10.10.0.100
  enable_vip: true
  vip_domain: api.k8s.local
dhcp:
  enable: true
nodes:
  - id: node1
    role: master
    mac: ["52:54:00:00:00:01", "52:54:00:00:01:01"]
    ip: ["172.17.0.50"]
  - id: node2
    role: master
    mac: ["52:54:00:00:00:02"]
  - id: node3
    role: minion
    mac: ["52:54:00:00:00:03", "52:54:00:00:01:03"]
  - id: node4
    role: storage
    mac: ["52:54:00:00:00:04"]
"#;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();
        temp_file
    }

    fn read_json(path: std::path::PathBuf) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Full provisioning pass from a YAML file to the output directory
    #[test]
    fn test_generate_from_yaml() {
        let file = write_config(CONFIG);
        let config = load_config(file.path()).unwrap();
        let out = TempDir::new().unwrap();

        let report = generate(&config, out.path()).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written.len(), 6);

        let nodes = &report.cluster.nodes;
        assert_eq!(nodes[0].nics[0].ip, Ipv4Addr::new(172, 17, 0, 50));
        assert_eq!(nodes[0].nics[1].ip, Ipv4Addr::new(10, 10, 0, 21));
        assert_eq!(nodes[1].nics[0].ip, Ipv4Addr::new(172, 17, 0, 21));
        assert_eq!(nodes[2].nics[0].ip, Ipv4Addr::new(172, 17, 0, 22));
        assert_eq!(nodes[2].nics[1].ip, Ipv4Addr::new(10, 10, 0, 22));
        assert_eq!(nodes[3].role, NodeRole::Plain);

        // Gateway and DHCP only on the first interface
        assert_eq!(nodes[0].nics[0].gateway, Some(Ipv4Addr::new(172, 17, 0, 254)));
        assert_eq!(nodes[0].nics[1].gateway, None);
        assert!(nodes[0].nics[0].dhcp);
        assert!(!nodes[0].nics[1].dhcp);

        // VIP lives in the second pool only
        assert_eq!(nodes[0].vip.as_ref().unwrap().interface, "eth1");
        assert!(nodes[1].vip.is_none());
        assert_eq!(nodes[2].vip.as_ref().unwrap().interface, "eth1");
        assert!(nodes[3].vip.is_none());

        let info = &report.cluster.info;
        assert_eq!(
            info.initial_cluster,
            "node1=http://node1.k8s.local:2380,node2=http://node2.k8s.local:2380"
        );
        assert_eq!(
            info.endpoints,
            "http://node1.k8s.local:2379,http://node2.k8s.local:2379"
        );
        assert_eq!(info.controller_endpoint, "https://api.k8s.local");

        let controller = read_json(out.path().join("node1.json"));
        assert_eq!(controller["profile"], "k8s-controller");
        assert_eq!(controller["metadata"]["vip"]["interface"], "eth1");

        let worker = read_json(out.path().join("node3.json"));
        assert_eq!(worker["metadata"]["k8s_controller_endpoint"], "https://api.k8s.local");

        let plain = read_json(out.path().join("node4.json"));
        assert_eq!(plain["profile"], "node");

        let dnsmasq = std::fs::read_to_string(out.path().join("dnsmasq.conf")).unwrap();
        assert!(dnsmasq.contains("dhcp-range=172.17.0.235,172.17.0.255\n"));
        assert!(dnsmasq.contains("dhcp-host=52:54:00:00:01:03,10.10.0.22,1h\n"));
        assert!(dnsmasq.contains("address=/api.k8s.local/10.10.0.100\n"));
        assert!(dnsmasq.contains("address=/node4.k8s.local/172.17.0.23\n"));
    }

    /// A VIP outside every pool aborts the run before any file is written
    #[test]
    fn test_unplaceable_vip_aborts() {
        let yaml = CONFIG.replace("vip: 10.10.0.100", "vip: 192.168.77.1");
        let file = write_config(&yaml);
        let config = load_config(file.path()).unwrap();
        let out = TempDir::new().unwrap();
        let target = out.path().join("out");

        assert!(generate(&config, &target).is_err());
        assert!(!target.exists());
    }

    /// Pool behaviour seen from outside the crate
    #[test]
    fn test_pool_contract() {
        let resolved = AddressPool::from_spec("192.168.56.5:172.0.0.5", 20).unwrap();
        assert!(matches!(resolved.advisory, Some(PoolSpecError::StartNotInRange { .. })));
        assert_eq!(resolved.value.network().to_string(), "192.168.56.0/24");
        assert_eq!(resolved.value.start(), Ipv4Addr::new(192, 168, 56, 1));
        assert_eq!(resolved.value.end(), Ipv4Addr::new(192, 168, 56, 255));

        let mut network = Network::new(&["1.2.3.5/16:1.2.3.200-1.2.3.202"], 2);
        assert_eq!(network.request_ip("a", 0).unwrap(), Ipv4Addr::new(1, 2, 3, 200));
        assert!(matches!(
            network.request_ip("b", 0),
            Err(lazykube::ip::NetworkError::Pool(PoolError::Exhausted { .. }))
        ));
        assert!(!network.contains(Ipv4Addr::new(1, 2, 3, 200), 1));
    }

    /// The shipped sample config stays loadable
    #[test]
    fn test_sample_config_loads() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("etc/lazykube.yaml");
        let config = load_config(&path).unwrap();
        assert_eq!(config.nodes.len(), 3);

        let mut network = build_network(&config);
        let cluster = build_cluster(&config, &mut network).unwrap();

        let mut addresses: Vec<Ipv4Addr> = cluster
            .nodes
            .iter()
            .flat_map(|node| node.nics.iter().map(|nic| nic.ip))
            .collect();
        assert_eq!(addresses.len(), 5);
        let vip: Ipv4Addr = config.network.vip.as_deref().unwrap().parse().unwrap();
        assert!(!addresses.contains(&vip));

        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 5, "every interface gets its own address");

        assert_eq!(cluster.nodes[0].primary_ip(), Some(Ipv4Addr::new(172, 17, 0, 50)));
        assert_eq!(cluster.nodes[1].primary_ip(), Some(Ipv4Addr::new(172, 17, 0, 21)));
        assert_eq!(cluster.nodes[2].primary_ip(), Some(Ipv4Addr::new(172, 17, 0, 22)));
    }
}
