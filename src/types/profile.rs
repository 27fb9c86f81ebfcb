use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::{User, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    Small,
    Medium,
    Large,
}

impl Plan {
    pub fn code(&self) -> &'static str {
        match self {
            Plan::Small => "small",
            Plan::Medium => "medium",
            Plan::Large => "large",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Small => "MAŁY PARKING",
            Plan::Medium => "ŚREDNI PARKING",
            Plan::Large => "DUŻY PARKING",
        }
    }

    pub fn limit(&self) -> i32 {
        match self {
            Plan::Small => 50,
            Plan::Medium => 100,
            Plan::Large => 500,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Plan {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "small" => Ok(Plan::Small),
            "medium" => Ok(Plan::Medium),
            "large" => Ok(Plan::Large),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SetPlanRequest {
    pub plan_code: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProfileResponse {
    pub plan: Option<String>,
    pub plan_code: Option<String>,
    pub plan_name: Option<&'static str>,
    pub usage: i32,
    pub limit: i32,
    pub username: String,
    pub email: String,
}

impl ProfileResponse {
    pub fn new(profile: &UserProfile, user: &User) -> ProfileResponse {
        let plan = profile
            .plan_code
            .as_deref()
            .and_then(|code| code.parse::<Plan>().ok());

        ProfileResponse {
            plan: profile.plan.clone(),
            plan_code: profile.plan_code.clone(),
            plan_name: plan.map(|plan| plan.display_name()),
            usage: profile.usage,
            limit: plan.map(|plan| plan.limit()).unwrap_or(0),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_plan_limits() {
        assert_eq!(Plan::Small.limit(), 50);
        assert_eq!(Plan::Medium.limit(), 100);
        assert_eq!(Plan::Large.limit(), 500);
    }

    #[test]
    fn test_plan_codes_are_exact() {
        assert_eq!("medium".parse::<Plan>(), Ok(Plan::Medium));
        assert!("Medium".parse::<Plan>().is_err());
        assert!("".parse::<Plan>().is_err());
    }

    #[test]
    fn test_profile_without_plan() {
        let user = User {
            id: 7,
            username: String::from("jan"),
            email: String::from("jan@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: None,
            date_joined: Utc::now(),
        };
        let profile = UserProfile {
            id: 1,
            user_id: 7,
            plan: None,
            plan_code: None,
            usage: 3,
        };

        let response = ProfileResponse::new(&profile, &user);
        assert_eq!(response.limit, 0);
        assert_eq!(response.plan_name, None);
        assert_eq!(response.usage, 3);
        assert_eq!(response.username, "jan");
    }
}
