use std::env;
use std::time::Duration;

use dnsclient::{Client, ClientConfig};

/// Usage: lookup <name-or-address> [server...]
fn main() -> dnsclient::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let target = args.next().unwrap_or_else(|| "dns.quad9.net".to_string());
    let servers: Vec<String> = args.collect();

    let config = ClientConfig {
        servers: if servers.is_empty() {
            vec!["9.9.9.9".to_string()]
        } else {
            servers
        },
        retries: 3,
        timeout: Duration::from_secs(2),
        ..ClientConfig::default()
    };
    println!("{config}");

    let client = Client::from_config(config);

    if target.parse::<std::net::IpAddr>().is_ok() {
        println!("Reverse lookup for {target}:");
        for name in client.lookup_addr(&target)? {
            println!("  {name}");
        }
    } else {
        println!("Addresses for {target}:");
        match client.lookup_hostname(&target) {
            Ok(addresses) => {
                for address in addresses {
                    println!("  {address}");
                }
            }
            Err(e) => {
                for address in e.partial_results() {
                    println!("  {address}");
                }
                return Err(e);
            }
        }
    }

    Ok(())
}
