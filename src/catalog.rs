use crate::inventory::NewInventoryItem;

/// Cost implied by a selling price and a target margin, rounded to a whole unit.
pub fn cost_from_margin(selling_price: f64, margin_percent: f64) -> f64 {
    (selling_price * (1.0 - margin_percent / 100.0)).round()
}

const FOOD: &str = "Dine In Food Menu";
const BAR: &str = "Bar Menu";
const OTHERS: &str = "Others";

// (name, selling price, target margin %, category)
const DEFAULT_MENU: &[(&str, f64, f64, &str)] = &[
    ("Non Veg Sweet Corn Soup", 199.0, 50.0, FOOD),
    ("Crispy Corn", 249.0, 52.0, FOOD),
    ("Mushroom Salt And Pepper", 299.0, 50.0, FOOD),
    ("Chilli Chicken", 349.0, 48.0, FOOD),
    ("Chilli Prawns", 449.0, 42.0, FOOD),
    ("Dragon Chicken", 349.0, 48.0, FOOD),
    ("Chilli Egg", 249.0, 50.0, FOOD),
    ("Chicken Lollipop", 399.0, 45.0, FOOD),
    ("Chicken Drum Sticks", 399.0, 45.0, FOOD),
    ("Appolo Fish", 299.0, 48.0, FOOD),
    ("Pepper Chicken", 399.0, 47.0, FOOD),
    ("Chilli Loose Prawn", 449.0, 40.0, FOOD),
    ("Chicken Roast", 349.0, 48.0, FOOD),
    ("Chicken 65", 349.0, 48.0, FOOD),
    ("Crunchi Chicken", 399.0, 47.0, FOOD),
    ("Salt French Fries", 199.0, 60.0, FOOD),
    ("Green Salda", 149.0, 65.0, FOOD),
    ("Kaju Fry", 349.0, 35.0, FOOD),
    ("kaju chicken", 399.0, 38.0, FOOD),
    ("Veg Fried Rice", 249.0, 55.0, FOOD),
    ("Egg Fried Rice", 279.0, 52.0, FOOD),
    ("spl veg fried rice", 299.0, 50.0, FOOD),
    ("spl non veg fried rice", 349.0, 48.0, FOOD),
    ("mixed non veg fried rice", 399.0, 45.0, FOOD),
    ("Konaseema Boneless Biriyani", 449.0, 42.0, FOOD),
    ("butter garlice prwans", 499.0, 38.0, FOOD),
    ("Coke", 99.0, 70.0, BAR),
    ("Thumsup", 99.0, 70.0, BAR),
    ("Sprit", 99.0, 70.0, BAR),
    ("Fresh Lemon Soda", 129.0, 72.0, BAR),
    ("Blue Lagoon", 199.0, 65.0, BAR),
    ("Orange Mojito", 199.0, 65.0, BAR),
    ("Mango Mojito", 199.0, 65.0, BAR),
    ("Pineapple Mojito", 199.0, 65.0, BAR),
    ("Virgin Mojito", 179.0, 65.0, BAR),
    ("Mint & Mango", 199.0, 65.0, BAR),
    ("Red Bull", 249.0, 55.0, BAR),
    ("Cranberry (premium)", 249.0, 45.0, BAR),
    ("Kf Strong", 299.0, 50.0, BAR),
    ("Kf Ultra", 349.0, 48.0, BAR),
    ("Heineken Tin", 399.0, 40.0, BAR),
    ("Budweiser", 349.0, 42.0, BAR),
    ("Budweiser Magnum", 449.0, 40.0, BAR),
    ("Budweiser 500ml", 399.0, 42.0, BAR),
    ("Screwdriver", 399.0, 60.0, BAR),
    ("Absolut (30 Ml)", 299.0, 55.0, BAR),
    ("Black Dog (30 Ml)", 299.0, 55.0, BAR),
    ("M.m Green 30ml", 199.0, 58.0, BAR),
    ("MC 1 QUTR", 349.0, 52.0, BAR),
    ("Jocobs Greek (150 Ml)", 799.0, 45.0, BAR),
    ("Water Bottle", 49.0, 60.0, OTHERS),
];

/// Restaurant and bar menu used to seed a fresh inventory.
pub fn default_catalog() -> Vec<NewInventoryItem> {
    DEFAULT_MENU
        .iter()
        .map(|&(name, selling_price, margin_percent, category)| NewInventoryItem {
            name: name.to_string(),
            cost_price: cost_from_margin(selling_price, margin_percent),
            selling_price,
            margin_percent,
            category: category.to_string(),
        })
        .collect()
}
