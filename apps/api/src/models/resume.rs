use serde::{Deserialize, Serialize};

/// A user's resume document.
///
/// Every field defaults, so an absent or partially stored document always
/// deserializes into a fully-initialized structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub personal_info: PersonalInfo,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ProjectEntry>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
}

/// Field-level merge for personal info; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub start_date: String,
    pub end_date: String,
    pub gpa: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_document_is_fully_initialized() {
        let resume: Resume = serde_json::from_value(json!({})).unwrap();
        assert_eq!(resume, Resume::default());
        assert!(resume.personal_info.name.is_empty());
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let resume: Resume = serde_json::from_value(json!({
            "personal_info": { "name": "Ada" },
            "education": [{ "school": "MIT" }]
        }))
        .unwrap();
        assert_eq!(resume.personal_info.name, "Ada");
        assert_eq!(resume.personal_info.email, "");
        assert_eq!(resume.education[0].school, "MIT");
        assert_eq!(resume.education[0].degree, "");
        assert!(resume.projects.is_empty());
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(serde_json::from_value::<Resume>(json!({ "skills": "rust" })).is_err());
    }
}
