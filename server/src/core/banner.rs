//! Startup banner and URL display

use super::config::is_all_interfaces;
use super::constants::APP_NAME;
use crate::utils::terminal::{dim_line, link_line};

/// Print the startup banner with the API entry points
pub fn print_banner(host: &str, port: u16, database: &str) {
    // Use localhost for display when binding to all interfaces
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };
    let base = format!("http://{}:{}", display_host, port);

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", link_line("Surveys:", &format!("{}/api/v1/surveys", base)));
    println!("{}", link_line("API docs:", &format!("{}/api/docs", base)));
    println!("{}", link_line("Health:", &format!("{}/api/v1/health", base)));

    if host == "127.0.0.1" || host == "localhost" {
        println!("{}", dim_line("Network:", "use --host 0.0.0.0 to expose"));
    } else if is_all_interfaces(host) {
        if let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                println!(
                    "{}",
                    link_line("Network:", &format!("http://{}:{}", ip, port))
                );
            }
        }
    } else {
        println!("{}", link_line("Network:", &format!("http://{}:{}", host, port)));
    }
    println!("{}", dim_line("Database:", database));

    println!();
}
