//! Wire types shared with the external auth/nutrition API.

use serde::{Deserialize, Serialize};

/// Signed-in user as shown in the UI. Rebuilt from token claims server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieRequest {
    pub dish_name: String,
    pub servings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macronutrients {
    pub protein: f64,
    pub total_fat: f64,
    pub carbohydrates: f64,
    pub fiber: f64,
    pub sugars: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientBreakdown {
    pub name: String,
    pub calories_per_100g: f64,
    pub macronutrients_per_100g: Macronutrients,
    pub serving_size: String,
    pub data_type: String,
    pub fdc_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedFood {
    pub name: String,
    pub fdc_id: i64,
    pub data_type: String,
    pub published_date: String,
}

/// Calorie breakdown for a dish, as computed by the external API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieResponse {
    pub dish_name: String,
    pub servings: f64,
    pub calories_per_serving: f64,
    pub total_calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macronutrients_per_serving: Option<Macronutrients>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_macronutrients: Option<Macronutrients>,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_breakdown: Option<Vec<IngredientBreakdown>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_food: Option<MatchedFood>,
}

/// Error body returned by the external API on failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<std::collections::BTreeMap<String, Vec<String>>>,
}
