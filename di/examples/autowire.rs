use fibre_di::{Arguments, Container, Injectable, Parameter, Result};
use std::rc::Rc;

struct Settings {
  retries: u32,
}

impl Injectable for Settings {
  const NAME: &'static str = "Settings";

  fn parameters() -> Vec<Parameter> {
    vec![Parameter::value("retries").with_default(3)]
  }

  fn construct(args: &Arguments) -> Result<Self> {
    Ok(Settings {
      retries: args.value("retries")?,
    })
  }
}

struct HttpClient {
  settings: Rc<Settings>,
  base_url: String,
}

impl Injectable for HttpClient {
  const NAME: &'static str = "HttpClient";

  fn parameters() -> Vec<Parameter> {
    vec![
      Parameter::service("settings", "Settings"),
      Parameter::value("base_url"),
    ]
  }

  fn construct(args: &Arguments) -> Result<Self> {
    Ok(HttpClient {
      settings: args.service("settings")?,
      base_url: args.value("base_url")?,
    })
  }
}

fn main() {
  let mut container = Container::new();
  container.declare::<Settings>();
  container.declare::<HttpClient>();

  // `base_url` has no default, so construction fails until it is provided.
  match container.get_any("HttpClient") {
    Err(err) => println!("Before set_argument: {}", err),
    Ok(_) => unreachable!("base_url is required"),
  }

  container.set_argument("base_url", "https://api.example.com");
  let client = container.get::<HttpClient>("HttpClient").unwrap();
  println!(
    "Client for {} with {} retries",
    client.base_url, client.settings.retries
  );
  assert_eq!(client.settings.retries, 3);

  // Names are matched case-insensitively on a second attempt.
  let again = container.get::<HttpClient>("httpclient").unwrap();
  assert_eq!(again.base_url, client.base_url);
}
