use tracing::warn;

use crate::types::{Position, RankedShop, ShopRecord};

/// Number of shops kept after ranking.
pub const TOP_SHOPS: usize = 3;

/// Decimal places kept in a ranked distance.
pub const DISTANCE_PRECISION: i32 = 4;

pub fn calculate_distance(a: &Position, b: &Position) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Rounds half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Parses the textual coordinates of a shop record.
///
/// Returns `None` unless both values are finite numbers.
pub fn shop_position(record: &ShopRecord) -> Option<Position> {
    let x = record.x.trim().parse::<f64>().ok()?;
    let y = record.y.trim().parse::<f64>().ok()?;
    let position = Position::new(x, y);
    position.is_valid().then_some(position)
}

/// Ranks shops by distance to `position` and keeps the closest [`TOP_SHOPS`].
///
/// Records with unusable coordinates are skipped. Shops at equal distance keep
/// the order in which the API listed them.
pub fn rank_shops(position: &Position, records: &[ShopRecord]) -> Vec<RankedShop> {
    let mut ranked: Vec<RankedShop> = records
        .iter()
        .filter_map(|record| match shop_position(record) {
            Some(shop) => Some(RankedShop {
                name: record.name.clone(),
                distance: round_to(calculate_distance(position, &shop), DISTANCE_PRECISION),
            }),
            None => {
                warn!(
                    shop = %record.name,
                    x = %record.x,
                    y = %record.y,
                    "skipping shop with unusable coordinates"
                );
                None
            }
        })
        .collect();

    sort_ranked_shops(&mut ranked);
    ranked.truncate(TOP_SHOPS);
    ranked
}

pub fn sort_ranked_shops(shops: &mut Vec<RankedShop>) {
    // sort_by is stable, ties keep input order
    shops.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}
