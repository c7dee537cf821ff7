mod finder;

pub use finder::ShopFinder;
