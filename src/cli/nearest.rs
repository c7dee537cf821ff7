use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::ClientConfig,
    error, info,
    management::ShopFinder,
    success,
    types::{Position, RankedShop, RankedShopTableRow},
    warning,
};

/// Finds and prints the coffee shops nearest to the given coordinates.
///
/// Reads the API configuration from the environment, runs the lookup behind a
/// spinner and prints one `name, distance` line per shop, or a table when
/// `table` is set.
///
/// # Arguments
///
/// * `x` - Query x coordinate as typed by the user
/// * `y` - Query y coordinate as typed by the user
/// * `table` - Render the result as a table instead of plain lines
///
/// # Error Handling
///
/// Invalid coordinates, an unusable configuration and any failure while
/// talking to the API terminate the program with an error message naming the
/// stage that failed.
pub async fn nearest(x: Option<String>, y: Option<String>, table: bool) {
    let position = match Position::from_args(x.into_iter().chain(y)) {
        Ok(p) => p,
        Err(e) => error!("Please provide valid x and y coordinates. Err: {}", e),
    };

    let finder = match ShopFinder::from_config(ClientConfig::from_env()) {
        Ok(f) => f,
        Err(e) => error!("Cannot set up the coffee shop client. Err: {}", e),
    };

    info!("Starting search near ({}, {})...", position.x, position.y);

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching nearby coffee shops...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = finder.nearest_shops(Some(position)).await;
    pb.finish_and_clear();

    match result {
        Ok(shops) if shops.is_empty() => warning!("No coffee shops found."),
        Ok(shops) => {
            success!("Nearest coffee shops:");
            print_shops(&shops, table);
        }
        Err(e) => error!("Coffee shop lookup failed during {}. Err: {}", e.stage(), e),
    }
}

fn print_shops(shops: &[RankedShop], table: bool) {
    if table {
        let rows: Vec<RankedShopTableRow> = shops.iter().map(RankedShopTableRow::from).collect();
        println!("{}", Table::new(rows));
        return;
    }

    for shop in shops {
        println!("{}, {}", shop.name, shop.distance);
    }
}
