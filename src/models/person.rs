use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

impl Person {
    pub fn new(id: &str, name: &str, emoji: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
        }
    }
}

pub fn default_people() -> Vec<Person> {
    vec![
        Person::new("person1", "Person 1", "👤"),
        Person::new("person2", "Person 2", "👥"),
    ]
}
