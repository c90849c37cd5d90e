use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Column order of `pets.csv`. The header row is written exactly like this.
pub const PET_CSV_FIELDS: [&str; 17] = [
    "link",
    "pet_type",
    "name",
    "location",
    "age",
    "gender",
    "size",
    "color",
    "breed",
    "spayed_neutered",
    "vaccinated",
    "special_needs",
    "kids_compatible",
    "dogs_compatible",
    "cats_compatible",
    "about_me",
    "image",
];

/// One adoptable pet, keyed by `link`.
///
/// Boolean columns travel as the strings `"True"` / `"False"`, both in the CSV
/// file and in JSON, so consumers of either format see the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub link: String,
    pub pet_type: String,
    pub name: String,
    pub location: String,
    pub age: String,
    pub gender: String,
    pub size: String,
    pub color: String,
    pub breed: String,
    #[serde(with = "flag")]
    pub spayed_neutered: bool,
    #[serde(with = "flag")]
    pub vaccinated: bool,
    #[serde(with = "flag")]
    pub special_needs: bool,
    #[serde(with = "flag")]
    pub kids_compatible: bool,
    #[serde(with = "flag")]
    pub dogs_compatible: bool,
    #[serde(with = "flag")]
    pub cats_compatible: bool,
    pub about_me: String,
    pub image: String,
}

impl PetRecord {
    /// Render in `PET_CSV_FIELDS` order. `about_me` newlines are escaped so a
    /// record always occupies exactly one physical line.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.link.clone(),
            self.pet_type.clone(),
            self.name.clone(),
            self.location.clone(),
            self.age.clone(),
            self.gender.clone(),
            self.size.clone(),
            self.color.clone(),
            self.breed.clone(),
            flag_str(self.spayed_neutered).into(),
            flag_str(self.vaccinated).into(),
            flag_str(self.special_needs).into(),
            flag_str(self.kids_compatible).into(),
            flag_str(self.dogs_compatible).into(),
            flag_str(self.cats_compatible).into(),
            escape_newlines(&self.about_me),
            self.image.clone(),
        ]
    }

    /// Build from a parsed row using the file's own header, so column order on
    /// disk does not matter. Missing columns read as empty.
    pub fn from_row(header: &[String], row: &[String]) -> Self {
        let get = |name: &str| -> String {
            header
                .iter()
                .position(|h| h == name)
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or_default()
        };

        Self {
            link: get("link"),
            pet_type: get("pet_type"),
            name: get("name"),
            location: get("location"),
            age: get("age"),
            gender: get("gender"),
            size: get("size"),
            color: get("color"),
            breed: get("breed"),
            spayed_neutered: parse_flag(&get("spayed_neutered")),
            vaccinated: parse_flag(&get("vaccinated")),
            special_needs: parse_flag(&get("special_needs")),
            kids_compatible: parse_flag(&get("kids_compatible")),
            dogs_compatible: parse_flag(&get("dogs_compatible")),
            cats_compatible: parse_flag(&get("cats_compatible")),
            about_me: get("about_me"),
            image: get("image"),
        }
    }
}

/// Replace every LF and every CR with the two characters `\n`. A CRLF pair
/// therefore becomes `\n\n`, matching files the scraper already wrote.
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\n")
}

pub fn flag_str(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

mod flag {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(flag_str(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Text(String),
        }
        Ok(match Raw::deserialize(d)? {
            Raw::Bool(b) => b,
            Raw::Text(t) => parse_flag(&t),
        })
    }
}
