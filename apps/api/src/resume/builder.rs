//! In-memory resume edits.
//!
//! Edits are structural only: append, replace or remove entries in the ordered
//! sections, and merge personal info field by field. Nothing is persisted here;
//! the caller saves the whole document afterwards.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::{
    EducationEntry, ExperienceEntry, PersonalInfo, PersonalInfoPatch, ProjectEntry, Resume,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ResumeEdit {
    UpdatePersonalInfo { patch: PersonalInfoPatch },

    AddEducation {
        #[serde(default)]
        entry: EducationEntry,
    },
    UpdateEducation { index: usize, entry: EducationEntry },
    RemoveEducation { index: usize },

    AddExperience {
        #[serde(default)]
        entry: ExperienceEntry,
    },
    UpdateExperience { index: usize, entry: ExperienceEntry },
    RemoveExperience { index: usize },

    AddProject {
        #[serde(default)]
        entry: ProjectEntry,
    },
    UpdateProject { index: usize, entry: ProjectEntry },
    RemoveProject { index: usize },

    AddSkill {
        #[serde(default)]
        skill: String,
    },
    UpdateSkill { index: usize, skill: String },
    RemoveSkill { index: usize },
}

impl PersonalInfo {
    pub fn merge(&mut self, patch: PersonalInfoPatch) {
        let PersonalInfoPatch {
            name,
            email,
            phone,
            location,
            linkedin,
            github,
        } = patch;
        for (field, value) in [
            (&mut self.name, name),
            (&mut self.email, email),
            (&mut self.phone, phone),
            (&mut self.location, location),
            (&mut self.linkedin, linkedin),
            (&mut self.github, github),
        ] {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

impl Resume {
    pub fn apply(&mut self, edit: ResumeEdit) -> Result<(), AppError> {
        match edit {
            ResumeEdit::UpdatePersonalInfo { patch } => self.personal_info.merge(patch),

            ResumeEdit::AddEducation { entry } => self.education.push(entry),
            ResumeEdit::UpdateEducation { index, entry } => {
                replace_at(&mut self.education, index, entry, "education")?
            }
            ResumeEdit::RemoveEducation { index } => {
                remove_at(&mut self.education, index, "education")?
            }

            ResumeEdit::AddExperience { entry } => self.experience.push(entry),
            ResumeEdit::UpdateExperience { index, entry } => {
                replace_at(&mut self.experience, index, entry, "experience")?
            }
            ResumeEdit::RemoveExperience { index } => {
                remove_at(&mut self.experience, index, "experience")?
            }

            ResumeEdit::AddProject { entry } => self.projects.push(entry),
            ResumeEdit::UpdateProject { index, entry } => {
                replace_at(&mut self.projects, index, entry, "projects")?
            }
            ResumeEdit::RemoveProject { index } => {
                remove_at(&mut self.projects, index, "projects")?
            }

            ResumeEdit::AddSkill { skill } => self.skills.push(skill),
            ResumeEdit::UpdateSkill { index, skill } => {
                replace_at(&mut self.skills, index, skill, "skills")?
            }
            ResumeEdit::RemoveSkill { index } => remove_at(&mut self.skills, index, "skills")?,
        }
        Ok(())
    }

    /// Applies a batch all-or-nothing: on error `self` is left unchanged.
    pub fn apply_all(&mut self, edits: Vec<ResumeEdit>) -> Result<(), AppError> {
        let mut draft = self.clone();
        for (position, edit) in edits.into_iter().enumerate() {
            draft
                .apply(edit)
                .map_err(|e| match e {
                    AppError::Validation(msg) => {
                        AppError::Validation(format!("edit #{}: {msg}", position + 1))
                    }
                    other => other,
                })?;
        }
        *self = draft;
        Ok(())
    }
}

fn replace_at<T>(items: &mut [T], index: usize, value: T, section: &str) -> Result<(), AppError> {
    let len = items.len();
    let slot = items
        .get_mut(index)
        .ok_or_else(|| out_of_range(section, index, len))?;
    *slot = value;
    Ok(())
}

fn remove_at<T>(items: &mut Vec<T>, index: usize, section: &str) -> Result<(), AppError> {
    if index >= items.len() {
        return Err(out_of_range(section, index, items.len()));
    }
    items.remove(index);
    Ok(())
}

fn out_of_range(section: &str, index: usize, len: usize) -> AppError {
    AppError::Validation(format!(
        "{section} has {len} entries; index {index} is out of range"
    ))
}
