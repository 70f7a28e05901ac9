use super::{
    CreateFoodItemRequest, CreateRatingRequest, CreateRestaurantRequest, ItemCategory,
    RegisterRequest, UpdateFoodItemRequest, UpdateRatingRequest, ValidationError,
    ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

pub const MIN_RATING_VALUE: f64 = 1.0;
pub const MAX_RATING_VALUE: f64 = 5.0;
pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
pub const MIN_REVIEW_LENGTH: usize = 10;
pub const MAX_REVIEW_LENGTH: usize = 500;
pub const MIN_PASSWORD_LENGTH: usize = 8;

impl Validate for CreateFoodItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_description("description", &self.description)?;
        validate_ingredients(&self.ingredients)?;
        // Drinks must say what kind of drink they are
        if self.category == ItemCategory::Drink && self.drink_type.is_none() {
            return Err(ValidationError::RequiredField {
                field: "drink_type".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for UpdateFoodItemRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(description) = &self.description {
            validate_description("description", description)?;
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        Ok(())
    }
}

impl Validate for CreateRestaurantRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_description("description", &self.description)?;
        if self.cuisine_types.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "cuisine_types".to_string(),
            });
        }
        Ok(())
    }
}

impl Validate for CreateRatingRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_rating_value(self.rating)?;
        if let Some(review) = &self.review {
            validate_review_text(review)?;
        }
        Ok(())
    }
}

impl Validate for UpdateRatingRequest {
    fn validate(&self) -> ValidationResult<()> {
        if let Some(value) = self.rating {
            validate_rating_value(value)?;
        }
        if let Some(review) = &self.review {
            validate_review_text(review)?;
        }
        Ok(())
    }
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if self.password.len() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::TooShort {
                field: "password".to_string(),
                min_length: MIN_PASSWORD_LENGTH,
                actual_length: self.password.len(),
            });
        }
        Ok(())
    }
}

/// Rating values live in [1, 5]
pub fn validate_rating_value(value: f64) -> ValidationResult<()> {
    if !(MIN_RATING_VALUE..=MAX_RATING_VALUE).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING_VALUE.to_string(),
            max: MAX_RATING_VALUE.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length: MAX_NAME_LENGTH,
            actual_length: trimmed.len(),
        });
    }
    Ok(())
}

pub fn validate_description(field: &str, description: &str) -> ValidationResult<()> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    if trimmed.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max_length: MAX_DESCRIPTION_LENGTH,
            actual_length: trimmed.len(),
        });
    }
    Ok(())
}

pub fn validate_review_text(review: &str) -> ValidationResult<()> {
    if review.len() < MIN_REVIEW_LENGTH {
        return Err(ValidationError::TooShort {
            field: "review".to_string(),
            min_length: MIN_REVIEW_LENGTH,
            actual_length: review.len(),
        });
    }
    if review.len() > MAX_REVIEW_LENGTH {
        return Err(ValidationError::TooLong {
            field: "review".to_string(),
            max_length: MAX_REVIEW_LENGTH,
            actual_length: review.len(),
        });
    }
    Ok(())
}

pub fn validate_ingredients(ingredients: &[String]) -> ValidationResult<()> {
    if ingredients.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "ingredients".to_string(),
        });
    }
    for ingredient in ingredients {
        if ingredient.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "ingredients".to_string(),
                value: ingredient.clone(),
                reason: "Ingredient names cannot be empty".to_string(),
            });
        }
    }
    Ok(())
}

pub fn validate_username(username: &str) -> ValidationResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "username".to_string(),
        });
    }
    if trimmed.len() > 64 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max_length: 64,
            actual_length: trimmed.len(),
        });
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err(ValidationError::InvalidValue {
            field: "username".to_string(),
            value: username.to_string(),
            reason: "Only alphanumerics, '_', '-' and '.' are allowed".to_string(),
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> ValidationResult<()> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if !valid {
        return Err(ValidationError::InvalidValue {
            field: "email".to_string(),
            value: email.to_string(),
            reason: "Not a valid email address".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_value_bounds() {
        assert!(validate_rating_value(1.0).is_ok());
        assert!(validate_rating_value(5.0).is_ok());
        assert!(validate_rating_value(3.5).is_ok());
        assert!(validate_rating_value(0.5).is_err());
        assert!(validate_rating_value(5.5).is_err());
    }

    #[test]
    fn test_review_text_bounds() {
        assert!(validate_review_text("short").is_err());
        assert!(validate_review_text("long enough review").is_ok());
        assert!(validate_review_text(&"a".repeat(501)).is_err());
    }

    #[test]
    fn test_name_bounds() {
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", "Pad Thai").is_ok());
        assert!(validate_name("name", &"a".repeat(201)).is_err());
    }

    #[test]
    fn test_drink_requires_drink_type() {
        use crate::models::{Cuisine, MealType};

        let request = CreateFoodItemRequest {
            name: "Iced Coffee".to_string(),
            description: "Chilled coffee with ice".to_string(),
            cuisine: Cuisine::American,
            category: ItemCategory::Drink,
            drink_type: None,
            dietary_preferences: vec![],
            meal_types: vec![MealType::Breakfast],
            nutrition: None,
            ingredients: vec!["coffee".to_string(), "ice".to_string()],
            preparation_time_minutes: Some(5),
            image_url: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@nodot").is_err());
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice_99").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
    }
}
