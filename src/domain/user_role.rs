use serde::{Deserialize, Serialize};

// Role is fixed at registration and decides which endpoints a token can reach
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum UserRole{
    #[serde(rename = "CUSTOMER")]
    Customer,
    #[serde(rename = "RESTAURANT_MANAGER")]
    RestaurantManager,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl UserRole {
    pub fn parse(role: &str) -> Result<UserRole, String>{
        match role {
            "CUSTOMER" => Ok(UserRole::Customer),
            "RESTAURANT_MANAGER" => Ok(UserRole::RestaurantManager),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(format!("{} is not a valid user role", other))
        }
    }

    pub fn as_str(&self) -> &'static str{
        match self {
            UserRole::Customer => "CUSTOMER",
            UserRole::RestaurantManager => "RESTAURANT_MANAGER",
            UserRole::Admin => "ADMIN",
        }
    }
}
