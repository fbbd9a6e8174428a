//! Loads the layered configuration and prints the effective values
//!
//! Run with: cargo run --example config_usage
//!
//! Override values with environment variables:
//! ```bash
//! RETAILER_SECURITY__JWT_SECRET=dev-secret \
//! RETAILER_SERVER__PORT=3000 \
//! cargo run --example config_usage
//! ```

use retailer_auth::infrastructure::{config::Config, persistence::StoreKind};

fn main() {
  match Config::load() {
    Ok(config) => {
      println!("Configuration loaded successfully!");
      println!();
      println!("Server:");
      println!("  Host: {}", config.server.host);
      println!("  Port: {}", config.server.port);
      println!();
      println!("Database:");
      match StoreKind::from_url(&config.database.url) {
        Ok(kind) => println!("  Store: {}", kind),
        Err(e) => println!("  Store: {}", e),
      }
      println!("  Max Connections: {}", config.database.max_connections);
      println!(
        "  Query Timeout: {} seconds",
        config.database.query_timeout_seconds
      );
      println!();
      println!("Security:");
      println!("  Secret Length: {} bytes", config.security.jwt_secret.len());
      println!(
        "  Token TTL: {} seconds",
        config.security.token_ttl_seconds
      );
      println!(
        "  Argon2: m={} KiB, t={}, p={}",
        config.security.argon2_memory_kib,
        config.security.argon2_iterations,
        config.security.argon2_parallelism
      );
    }
    Err(e) => {
      eprintln!("Failed to load configuration: {}", e);
      std::process::exit(1);
    }
  }
}
