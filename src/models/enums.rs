use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cuisines known to the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cuisine {
    Italian,
    Mexican,
    Chinese,
    Japanese,
    Indian,
    American,
    Thai,
    Mediterranean,
    French,
    Korean,
}

impl Cuisine {
    pub const ALL: [Cuisine; 10] = [
        Cuisine::Italian,
        Cuisine::Mexican,
        Cuisine::Chinese,
        Cuisine::Japanese,
        Cuisine::Indian,
        Cuisine::American,
        Cuisine::Thai,
        Cuisine::Mediterranean,
        Cuisine::French,
        Cuisine::Korean,
    ];
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cuisine::Italian => "italian",
            Cuisine::Mexican => "mexican",
            Cuisine::Chinese => "chinese",
            Cuisine::Japanese => "japanese",
            Cuisine::Indian => "indian",
            Cuisine::American => "american",
            Cuisine::Thai => "thai",
            Cuisine::Mediterranean => "mediterranean",
            Cuisine::French => "french",
            Cuisine::Korean => "korean",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Cuisine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "italian" => Ok(Cuisine::Italian),
            "mexican" => Ok(Cuisine::Mexican),
            "chinese" => Ok(Cuisine::Chinese),
            "japanese" => Ok(Cuisine::Japanese),
            "indian" => Ok(Cuisine::Indian),
            "american" => Ok(Cuisine::American),
            "thai" => Ok(Cuisine::Thai),
            "mediterranean" => Ok(Cuisine::Mediterranean),
            "french" => Ok(Cuisine::French),
            "korean" => Ok(Cuisine::Korean),
            _ => Err(format!("Invalid cuisine: {}", s)),
        }
    }
}

/// Catalog item categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Food,
    Drink,
    Dessert,
    Appetizer,
    Side,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 5] = [
        ItemCategory::Food,
        ItemCategory::Drink,
        ItemCategory::Dessert,
        ItemCategory::Appetizer,
        ItemCategory::Side,
    ];
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemCategory::Food => "food",
            ItemCategory::Drink => "drink",
            ItemCategory::Dessert => "dessert",
            ItemCategory::Appetizer => "appetizer",
            ItemCategory::Side => "side",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(ItemCategory::Food),
            "drink" => Ok(ItemCategory::Drink),
            "dessert" => Ok(ItemCategory::Dessert),
            "appetizer" => Ok(ItemCategory::Appetizer),
            "side" => Ok(ItemCategory::Side),
            _ => Err(format!("Invalid item category: {}", s)),
        }
    }
}

/// Drink subtypes, only meaningful for `ItemCategory::Drink`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkType {
    Water,
    Soda,
    Juice,
    Coffee,
    Tea,
    Smoothie,
    Alcoholic,
    NonAlcoholic,
}

impl DrinkType {
    pub const ALL: [DrinkType; 8] = [
        DrinkType::Water,
        DrinkType::Soda,
        DrinkType::Juice,
        DrinkType::Coffee,
        DrinkType::Tea,
        DrinkType::Smoothie,
        DrinkType::Alcoholic,
        DrinkType::NonAlcoholic,
    ];
}

impl fmt::Display for DrinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DrinkType::Water => "water",
            DrinkType::Soda => "soda",
            DrinkType::Juice => "juice",
            DrinkType::Coffee => "coffee",
            DrinkType::Tea => "tea",
            DrinkType::Smoothie => "smoothie",
            DrinkType::Alcoholic => "alcoholic",
            DrinkType::NonAlcoholic => "non_alcoholic",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DrinkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "water" => Ok(DrinkType::Water),
            "soda" => Ok(DrinkType::Soda),
            "juice" => Ok(DrinkType::Juice),
            "coffee" => Ok(DrinkType::Coffee),
            "tea" => Ok(DrinkType::Tea),
            "smoothie" => Ok(DrinkType::Smoothie),
            "alcoholic" => Ok(DrinkType::Alcoholic),
            "non_alcoholic" => Ok(DrinkType::NonAlcoholic),
            _ => Err(format!("Invalid drink type: {}", s)),
        }
    }
}

/// Dietary preferences carried by items and user profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    Keto,
    Paleo,
    LowCarb,
    None,
}

impl DietaryPreference {
    pub const ALL: [DietaryPreference; 8] = [
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::DairyFree,
        DietaryPreference::Keto,
        DietaryPreference::Paleo,
        DietaryPreference::LowCarb,
        DietaryPreference::None,
    ];
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::GlutenFree => "gluten_free",
            DietaryPreference::DairyFree => "dairy_free",
            DietaryPreference::Keto => "keto",
            DietaryPreference::Paleo => "paleo",
            DietaryPreference::LowCarb => "low_carb",
            DietaryPreference::None => "none",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DietaryPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vegetarian" => Ok(DietaryPreference::Vegetarian),
            "vegan" => Ok(DietaryPreference::Vegan),
            "gluten_free" => Ok(DietaryPreference::GlutenFree),
            "dairy_free" => Ok(DietaryPreference::DairyFree),
            "keto" => Ok(DietaryPreference::Keto),
            "paleo" => Ok(DietaryPreference::Paleo),
            "low_carb" => Ok(DietaryPreference::LowCarb),
            "none" => Ok(DietaryPreference::None),
            _ => Err(format!("Invalid dietary preference: {}", s)),
        }
    }
}

/// Meal slots an item can be served for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
        MealType::Dessert,
    ];
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Dessert => "dessert",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            "dessert" => Ok(MealType::Dessert),
            _ => Err(format!("Invalid meal type: {}", s)),
        }
    }
}

/// Restaurant price bands, ordered `$` through `$$$$`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriceRange {
    #[serde(rename = "$")]
    Inexpensive,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
    #[serde(rename = "$$$$")]
    VeryExpensive,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::Inexpensive,
        PriceRange::Moderate,
        PriceRange::Expensive,
        PriceRange::VeryExpensive,
    ];

    /// Ordinal rank used by the price sort comparators, 1 through 4
    pub fn rank(&self) -> u8 {
        match self {
            PriceRange::Inexpensive => 1,
            PriceRange::Moderate => 2,
            PriceRange::Expensive => 3,
            PriceRange::VeryExpensive => 4,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriceRange::Inexpensive => "$",
            PriceRange::Moderate => "$$",
            PriceRange::Expensive => "$$$",
            PriceRange::VeryExpensive => "$$$$",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "$" => Ok(PriceRange::Inexpensive),
            "$$" => Ok(PriceRange::Moderate),
            "$$$" => Ok(PriceRange::Expensive),
            "$$$$" => Ok(PriceRange::VeryExpensive),
            _ => Err(format!("Invalid price range: {}", s)),
        }
    }
}

/// UI languages selectable in user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
    #[serde(rename = "fr")]
    French,
    #[serde(rename = "de")]
    German,
    #[serde(rename = "it")]
    Italian,
    #[serde(rename = "zh")]
    Chinese,
    #[serde(rename = "ja")]
    Japanese,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Chinese,
        Language::Japanese,
        Language::Korean,
    ];
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
            Language::Korean => "ko",
        };
        write!(f, "{}", s)
    }
}

/// Caller roles carried by auth tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

/// Sort keys accepted by the catalog query engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Relevance,
    Rating,
    Trending,
    PriceLow,
    PriceHigh,
    Newest,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Relevance => "relevance",
            SortKey::Rating => "rating",
            SortKey::Trending => "trending",
            SortKey::PriceLow => "price_low",
            SortKey::PriceHigh => "price_high",
            SortKey::Newest => "newest",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevance" => Ok(SortKey::Relevance),
            "rating" => Ok(SortKey::Rating),
            "trending" => Ok(SortKey::Trending),
            "price_low" => Ok(SortKey::PriceLow),
            "price_high" => Ok(SortKey::PriceHigh),
            "newest" => Ok(SortKey::Newest),
            _ => Err(format!("Invalid sort key: {}", s)),
        }
    }
}

/// Sort keys for the advanced rating listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewSortKey {
    #[default]
    Recent,
    Highest,
    Lowest,
    MostHelpful,
}

impl FromStr for ReviewSortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recent" => Ok(ReviewSortKey::Recent),
            "highest" => Ok(ReviewSortKey::Highest),
            "lowest" => Ok(ReviewSortKey::Lowest),
            "most_helpful" => Ok(ReviewSortKey::MostHelpful),
            _ => Err(format!("Invalid review sort key: {}", s)),
        }
    }
}

/// Upload categories, each with its own directory and extension allow-list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    FoodImages,
    RestaurantImages,
    UserImages,
    MenuImages,
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 5] = [
        FileCategory::FoodImages,
        FileCategory::RestaurantImages,
        FileCategory::UserImages,
        FileCategory::MenuImages,
        FileCategory::Other,
    ];

    /// Extensions accepted for uploads in this category (lowercase, with dot)
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            FileCategory::FoodImages
            | FileCategory::RestaurantImages
            | FileCategory::UserImages => &[".jpg", ".jpeg", ".png", ".webp"],
            FileCategory::MenuImages => &[".jpg", ".jpeg", ".png", ".webp", ".pdf"],
            FileCategory::Other => &[".pdf", ".doc", ".docx", ".txt", ".csv", ".xlsx"],
        }
    }

    /// Subdirectory under the upload root
    pub fn directory(&self) -> &'static str {
        match self {
            FileCategory::FoodImages => "food_images",
            FileCategory::RestaurantImages => "restaurant_images",
            FileCategory::UserImages => "user_images",
            FileCategory::MenuImages => "menu_images",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.directory())
    }
}

impl FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food_images" => Ok(FileCategory::FoodImages),
            "restaurant_images" => Ok(FileCategory::RestaurantImages),
            "user_images" => Ok(FileCategory::UserImages),
            "menu_images" => Ok(FileCategory::MenuImages),
            "other" => Ok(FileCategory::Other),
            _ => Err(format!("Invalid file category: {}", s)),
        }
    }
}

/// Helpful / unhelpful votes on a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Helpful,
    Unhelpful,
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteKind::Helpful => write!(f, "helpful"),
            VoteKind::Unhelpful => write!(f, "unhelpful"),
        }
    }
}

/// Why a review was reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportReason {
    Inappropriate,
    Spam,
    Fake,
    Offensive,
    Other,
}

/// Moderation state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Reviewed,
    Dismissed,
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ReportStatus::Pending),
            "reviewed" => Ok(ReportStatus::Reviewed),
            "dismissed" => Ok(ReportStatus::Dismissed),
            _ => Err(format!("Invalid report status: {}", s)),
        }
    }
}
