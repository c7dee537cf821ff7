//! Coffee Shop Finder Library
//!
//! This library finds the coffee shops nearest to a coordinate using the coffee
//! shop challenge API. It includes a resilient API client (token acquisition,
//! bounded requests, retry and re-authentication), a ranking engine and the
//! command-line layer built on top of them.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `coffee` - Coffee shop API client with timeouts and retries
//! - `config` - Configuration management and environment variables
//! - `error` - Error types shared by all layers
//! - `management` - Orchestration of a complete lookup
//! - `types` - Data structures and type definitions
//! - `utils` - Distance calculation and ranking
//!
//! # Example
//!
//! ```
//! use brewscout::{config::ClientConfig, management::ShopFinder, types::Position};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), brewscout::error::FinderError> {
//!     let finder = ShopFinder::from_config(ClientConfig::from_env())?;
//!     let shops = finder.nearest_shops(Some(Position::new(47.6, -122.4))).await?;
//!     for shop in shops {
//!         println!("{}, {}", shop.name, shop.distance);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod coffee;
pub mod config;
pub mod error;
pub mod management;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Starting search...");
/// info!("Found {} shops", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Nearest coffee shops:");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output on standard error with a red "!" indicator
/// and immediately terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Coffee shop lookup failed during {}", stage);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("No coffee shops found.");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
