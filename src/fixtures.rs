//! Literal records used as request bodies and expected responses

use crate::client::{Gender, Superhero, SuperheroError, User};

/// Negative id the service can never assign
pub const INVALID_ID: i64 = -5;

/// Id assumed free after the hero list is cleared
pub const NON_USED_ID: i64 = 1;

fn hero(
    birth_date: &str,
    city: &str,
    full_name: &str,
    gender: Gender,
    main_skill: Option<&str>,
    phone: Option<&str>,
) -> Superhero {
    Superhero {
        birth_date: Some(birth_date.to_string()),
        city: Some(city.to_string()),
        full_name: Some(full_name.to_string()),
        gender: Some(gender),
        id: 0,
        main_skill: main_skill.map(str::to_string),
        phone: phone.map(str::to_string),
    }
}

pub fn hero_with_all_fields() -> Superhero {
    Superhero {
        id: 33,
        ..hero(
            "1975-08-18",
            "New York",
            "Tony Stark",
            Gender::M,
            Some("Intelligence"),
            Some("+69817952"),
        )
    }
}

pub fn basic_hero() -> Superhero {
    hero(
        "1890-01-21",
        "New York",
        "Steve Rogers",
        Gender::M,
        Some("Physical abilities"),
        Some("+78971234580"),
    )
}

pub fn hero_without_phone() -> Superhero {
    hero("1920-08-12", "Gotham", "Bruce Wayne", Gender::M, Some("Money"), None)
}

pub fn hero_with_invalid_date() -> Superhero {
    hero(
        "no information",
        "Boston",
        "Logan",
        Gender::M,
        Some("Regeneration"),
        Some("+6797198453"),
    )
}

pub fn hero_for_update() -> Superhero {
    hero(
        "1756-05-11",
        "Boston",
        "James",
        Gender::M,
        Some("Claws"),
        Some("didn't exist"),
    )
}

pub fn hero_without_skill() -> Superhero {
    Superhero {
        id: 303,
        ..hero(
            "1990-03-21",
            "Bucharest",
            "Natasha",
            Gender::F,
            None,
            Some("+6719808254"),
        )
    }
}

/// Replacement body for update scenarios
pub fn wolverine() -> Superhero {
    hero(
        "1756-05-11",
        "Boston",
        "Wolverine",
        Gender::M,
        Some("Regeneration"),
        Some("987891"),
    )
}

/// Replacement body for the update-and-verify scenario
pub fn iron_man() -> Superhero {
    Superhero {
        id: 481,
        ..hero("1975-08-18", "New York", "Iron Man", Gender::M, Some("Technology"), None)
    }
}

/// Error body of an unknown route
pub fn no_message_available() -> SuperheroError {
    SuperheroError::with_message("No message available")
}

pub fn default_user() -> User {
    User {
        id: 4_815_162_342,
        username: Some("apiprobeDefaultUser".to_string()),
        first_name: Some("Peter".to_string()),
        last_name: Some("Parker".to_string()),
        email: Some("peter.parker@example.com".to_string()),
        password: Some("WithGreatPower".to_string()),
        phone: Some("+12125550123".to_string()),
        user_status: 0,
    }
}

/// User without any fields set
pub fn invalid_user() -> User {
    User::default()
}

pub fn steve_rogers() -> User {
    User {
        id: 33_397_108_721_110,
        username: Some("Just created expected user".to_string()),
        first_name: Some("Steven".to_string()),
        last_name: Some("Rogers".to_string()),
        email: Some("StevenRogers1899@gmail.com".to_string()),
        password: Some("DestroyNaziRegime".to_string()),
        phone: Some("098123756".to_string()),
        user_status: 0,
    }
}

pub fn jonathan_crane() -> User {
    User {
        id: 1_928_374_506,
        username: Some("uniqueUsername".to_string()),
        first_name: Some("Jonathan".to_string()),
        last_name: Some("Crane".to_string()),
        email: Some("DrCrane@example.com".to_string()),
        password: Some("trytoscareme!".to_string()),
        phone: Some("+79068713245093".to_string()),
        user_status: 0,
    }
}

/// `jonathan_crane` after the update scenario renames him
pub fn scarecrow() -> User {
    User {
        first_name: Some("Scarecrow".to_string()),
        last_name: Some("None".to_string()),
        ..jonathan_crane()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hero_without_skill_has_no_skill() {
        assert_eq!(hero_without_skill().main_skill, None);
        assert_eq!(hero_without_skill().id, 303);
    }

    #[test]
    fn test_scarecrow_keeps_username() {
        assert_eq!(scarecrow().username, jonathan_crane().username);
        assert_ne!(scarecrow().first_name, jonathan_crane().first_name);
    }
}
