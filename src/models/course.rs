use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed school-year labels a course can target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Seconde,
    #[serde(rename = "Première")]
    Premiere,
    Terminale,
    #[serde(rename = "1ère année")]
    FirstYear,
    #[serde(rename = "2ème année")]
    SecondYear,
    #[serde(rename = "3ème année")]
    ThirdYear,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Seconde,
        Level::Premiere,
        Level::Terminale,
        Level::FirstYear,
        Level::SecondYear,
        Level::ThirdYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Level::Seconde => "Seconde",
            Level::Premiere => "Première",
            Level::Terminale => "Terminale",
            Level::FirstYear => "1ère année",
            Level::SecondYear => "2ème année",
            Level::ThirdYear => "3ème année",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .iter()
            .copied()
            .find(|level| level.label() == s)
            .ok_or_else(|| format!("Unknown level: {}", s))
    }
}

/// An embedded PDF: original file name plus its data URI
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfAttachment {
    pub name: String,
    pub data: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub level: Level,
    pub description: String,
    #[serde(default)]
    pub course_pdf: Option<PdfAttachment>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub more_info_url: Option<String>,
    #[serde(default)]
    pub exercise_pdf: Option<PdfAttachment>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub exercise_visual_url: Option<String>,
    pub visible: bool,
    pub created_at: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDraft {
    pub title: String,
    pub category: String,
    pub level: Level,
    pub description: String,
    pub course_pdf: Option<PdfAttachment>,
    pub more_info_url: Option<String>,
    pub exercise_pdf: Option<PdfAttachment>,
    pub exercise_visual_url: Option<String>,
    pub visible: bool,
}

impl Default for CourseDraft {
    // Mirrors the empty course form
    fn default() -> Self {
        Self {
            title: String::new(),
            category: "Normes".to_string(),
            level: Level::Seconde,
            description: String::new(),
            course_pdf: None,
            more_info_url: None,
            exercise_pdf: None,
            exercise_visual_url: None,
            visible: true,
        }
    }
}

impl From<&Course> for CourseDraft {
    fn from(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            category: course.category.clone(),
            level: course.level,
            description: course.description.clone(),
            course_pdf: course.course_pdf.clone(),
            more_info_url: course.more_info_url.clone(),
            exercise_pdf: course.exercise_pdf.clone(),
            exercise_visual_url: course.exercise_visual_url.clone(),
            visible: course.visible,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
