use fibre_di::{Container, ContainerConfig};

const CONFIG: &str = r#"
alias_resolve_limit: 5
aliases:
  primary: replica_1
  writer: primary
arguments:
  pool_size: 16
"#;

struct Pool {
  name: String,
}

fn main() {
  let config = ContainerConfig::from_yaml_str(CONFIG).expect("valid config");
  println!("Loaded config: {:?}", config);

  let mut container = Container::with_config(config);
  container.register("replica_1", |_| Pool {
    name: "replica_1".to_string(),
  });

  let writer = container.get::<Pool>("writer").unwrap();
  println!("'writer' resolves to pool '{}'", writer.name);
  println!(
    "'writer' canonical name: {}",
    container.resolve_alias("writer").unwrap()
  );
  assert_eq!(writer.name, "replica_1");
  assert!(container.has("pool_size"));
}
