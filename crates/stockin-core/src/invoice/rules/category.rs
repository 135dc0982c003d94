//! Keyword-based store category guesses.

/// Category used when no keyword table matches.
pub const DEFAULT_CATEGORY: &str = "Groceries";

/// Category keyword tables, checked in this order. The first category with a
/// substring hit wins, so broad produce words shadow later tables.
static CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Fruit & Veg",
        &[
            "apple", "banana", "organic", "fresh", "vegetable", "fruit", "kale", "spinach",
            "lettuce", "tomato", "potato", "carrot", "onion", "avocado", "lemon", "berries",
            "mushroom",
        ],
    ),
    (
        "Supplements",
        &[
            "vitamin", "mineral", "capsule", "tablet", "protein", "probiotic", "magnesium",
            "zinc", "omega", "supplement", "collagen",
        ],
    ),
    (
        "Personal Care",
        &[
            "shampoo", "conditioner", "soap", "deodorant", "toothpaste", "lotion",
            "moisturiser", "moisturizer", "sunscreen", "body wash", "lip balm",
        ],
    ),
    (
        "Fridge & Freezer",
        &[
            "milk", "yoghurt", "yogurt", "cheese", "butter", "frozen", "ice cream", "tofu",
            "tempeh", "kefir",
        ],
    ),
    (
        "Drinks Fridge",
        &[
            "kombucha", "juice", "soda", "sparkling", "water", "cold brew", "energy drink",
        ],
    ),
    (
        "Fresh Bread",
        &[
            "bread", "loaf", "sourdough", "bagel", "baguette", "croissant", "muffin",
        ],
    ),
    (
        "Bulk",
        &["bulk", "5kg", "10kg", "20kg", "25kg", "sack"],
    ),
];

/// Guess the store category for a product name.
pub fn guess_category(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(guess_category("Pink Lady Apples"), "Fruit & Veg");
        assert_eq!(guess_category("Vitamin C 500mg"), "Supplements");
        assert_eq!(guess_category("Lavender Shampoo 500ml"), "Personal Care");
        assert_eq!(guess_category("Greek Yoghurt 1kg"), "Fridge & Freezer");
        assert_eq!(guess_category("Kombucha Ginger 330ml"), "Drinks Fridge");
        assert_eq!(guess_category("Spelt Sourdough Loaf"), "Fresh Bread");
        assert_eq!(guess_category("Rolled Oats 25kg"), "Bulk");
        assert_eq!(guess_category("Raw Cacao Powder 250g"), "Groceries");
    }

    #[test]
    fn test_declared_order_wins() {
        // "organic" (Fruit & Veg) is checked before "milk" (Fridge & Freezer)
        assert_eq!(guess_category("Organic Oat Milk"), "Fruit & Veg");
        // "protein" (Supplements) before "water" (Drinks Fridge)
        assert_eq!(guess_category("Protein Water"), "Supplements");
    }
}
