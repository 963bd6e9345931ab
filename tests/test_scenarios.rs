// Concrete scenario coverage for insert/override/coalescence/merge semantics.

use cidrtree::{Family, Merger, Network, RecordSize, Tree};

fn host(addr: &str) -> Network {
    Network::parse(addr, 32, Family::V4).unwrap()
}

fn lookup(tree: &Tree<&'static str>, addr: &str) -> Option<&'static str> {
    tree.lookup_ip(addr.parse().unwrap()).unwrap().copied()
}

#[test]
fn scenario_override_wider_first() {
    let mut tree: Tree<&str> = Tree::new(Family::V4, RecordSize::Bits32, 64);
    let wide = Network::parse("1.1.1.0", 28, Family::V4).unwrap();
    tree.insert_network(wide, b"A", "A").unwrap();
    for host_byte in 1..=32u8 {
        let net = host(&format!("1.1.1.{}", host_byte));
        tree.insert_network(net, b"B", "B").unwrap();
    }

    assert_eq!(lookup(&tree, "1.1.1.0"), Some("A"));
    assert_eq!(lookup(&tree, "1.1.1.1"), Some("B"));
    assert_eq!(lookup(&tree, "1.1.1.32"), Some("B"));
    assert_eq!(lookup(&tree, "1.1.1.33"), None);
}

#[test]
fn scenario_override_narrower_first() {
    let mut tree: Tree<&str> = Tree::new(Family::V4, RecordSize::Bits32, 64);
    for host_byte in 1..=32u8 {
        let net = host(&format!("1.1.1.{}", host_byte));
        tree.insert_network(net, b"A", "A").unwrap();
    }
    let wide = Network::parse("1.1.1.0", 28, Family::V4).unwrap();
    tree.insert_network(wide, b"B", "B").unwrap();

    assert_eq!(lookup(&tree, "1.1.1.0"), Some("B"));
    assert_eq!(lookup(&tree, "1.1.1.15"), Some("B"));
    assert_eq!(lookup(&tree, "1.1.1.16"), Some("A"));
    assert_eq!(lookup(&tree, "1.1.1.32"), Some("A"));
}

#[test]
fn scenario_containment() {
    let mut tree: Tree<&str> = Tree::new(Family::V4, RecordSize::Bits32, 64);
    let wide = Network::parse("1.1.1.0", 28, Family::V4).unwrap();
    tree.insert_network(wide, b"A", "A").unwrap();
    for host_byte in 1..=14u8 {
        let net = host(&format!("1.1.1.{}", host_byte));
        tree.insert_network(net, b"B", "B").unwrap();
    }

    assert_eq!(lookup(&tree, "1.1.1.0"), Some("A"));
    assert_eq!(lookup(&tree, "1.1.1.1"), Some("B"));
    assert_eq!(lookup(&tree, "1.1.1.14"), Some("B"));
    assert_eq!(lookup(&tree, "1.1.1.15"), Some("A"));
}

#[test]
fn scenario_full_coalescence_various_subnet_counts() {
    for shift in 1..=8u8 {
        // N = 2^shift equal subnets of 0.0.0.0/1, each mask_length = 1 + shift
        let n = 1u32 << shift;
        let mask = 1 + shift;
        let mut tree: Tree<&str> = Tree::new(Family::V4, RecordSize::Bits32, 64);
        for i in 0..n {
            let base = (i << (32 - mask)) as u32;
            let ip = std::net::Ipv4Addr::from(base);
            let net = Network::parse(&ip.to_string(), mask as u8, Family::V4).unwrap();
            tree.insert_network(net, b"D", "D").unwrap();
        }
        tree.finalize();
        assert_eq!(
            lookup(&tree, "0.0.0.0"),
            Some("D"),
            "n={n} shift={shift} start"
        );
        assert_eq!(
            lookup(&tree, "100.0.0.0"),
            Some("D"),
            "n={n} shift={shift} mid"
        );
        assert_eq!(
            lookup(&tree, "128.0.0.0"),
            None,
            "n={n} shift={shift} outside /1"
        );
    }
}

#[test]
fn scenario_single_host_32() {
    let mut tree: Tree<&str> = Tree::new(Family::V4, RecordSize::Bits32, 64);
    tree.insert_network(host("0.0.0.0"), b"only", "only").unwrap();

    assert_eq!(lookup(&tree, "0.0.0.0"), Some("only"));
    assert_eq!(lookup(&tree, "0.0.0.1"), None);
    assert_eq!(lookup(&tree, "255.255.255.255"), None);
}

struct ConcatMerger;
impl Merger<String> for ConcatMerger {
    fn merge(&mut self, existing: &String, incoming: &String) -> String {
        format!("{},{}", existing, incoming)
    }
}

#[test]
fn scenario_merge_on_collision_layered() {
    let mut tree: Tree<String> = Tree::new(Family::V4, RecordSize::Bits32, 64)
        .with_merge_record_collisions(true)
        .with_merger(ConcatMerger);

    let wide = Network::parse("1.0.0.0", 24, Family::V4).unwrap();
    tree.insert_network(wide, b"foo", "foo:42".into()).unwrap();

    for host_byte in 1..=15u8 {
        let net = Network::parse(&format!("1.0.0.{}", host_byte), 32, Family::V4).unwrap();
        tree.insert_network(net, b"bar", "bar:84".into()).unwrap();
    }

    for host_byte in 9..=13u8 {
        let net = Network::parse(&format!("1.0.0.{}", host_byte), 32, Family::V4).unwrap();
        tree.insert_network(net, b"baz", "baz:168".into()).unwrap();
    }

    let get = |addr: &str| tree.lookup_ip(addr.parse().unwrap()).unwrap().cloned();
    assert_eq!(get("1.0.0.0"), Some("foo:42".into()));
    for host_byte in 1..=8u8 {
        assert_eq!(
            get(&format!("1.0.0.{}", host_byte)),
            Some("foo:42,bar:84".into())
        );
    }
    for host_byte in 9..=13u8 {
        assert_eq!(
            get(&format!("1.0.0.{}", host_byte)),
            Some("foo:42,bar:84,baz:168".into())
        );
    }
    for host_byte in 14..=15u8 {
        assert_eq!(
            get(&format!("1.0.0.{}", host_byte)),
            Some("foo:42,bar:84".into())
        );
    }
    assert_eq!(get("1.0.0.16"), Some("foo:42".into()));
    assert_eq!(get("1.0.0.255"), Some("foo:42".into()));
}
