use serde::{Deserialize, Serialize};

/// One entry of the persisted crush collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crush {
    pub id: u64,
    pub name: String,
    pub age: u64,
    pub date: DateRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRecord {
    /// `DD/MM/YYYY`, shape-checked only
    pub dated_at: String,
    pub rate: u8,
}

/// Validated create/update body, produced by the crush gate pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrushInput {
    pub name: String,
    pub age: u64,
    pub date: DateRecord,
}

impl Crush {
    pub fn from_input(id: u64, input: CrushInput) -> Self {
        Self {
            id,
            name: input.name,
            age: input.age,
            date: input.date,
        }
    }

    /// Overwrite the mutable fields, keeping the id
    pub fn apply(&mut self, input: CrushInput) {
        self.name = input.name;
        self.age = input.age;
        self.date = input.date;
    }
}
