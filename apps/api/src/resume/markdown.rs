use crate::models::resume::Resume;

/// Renders the resume as a Markdown document. Empty sections are skipped and
/// blank fields are left out of each entry line.
pub fn render_resume_to_md(resume: &Resume) -> String {
    let info = &resume.personal_info;
    let name = if info.name.trim().is_empty() {
        "Resume"
    } else {
        info.name.trim()
    };
    let mut md = format!("# {name}\n\n");

    let contact = join_present(
        &[
            &info.email,
            &info.phone,
            &info.location,
            &info.linkedin,
            &info.github,
        ],
        " | ",
    );
    if !contact.is_empty() {
        md.push_str(&contact);
        md.push_str("\n\n");
    }

    if !resume.education.is_empty() {
        md.push_str("## Education\n\n");
        for entry in &resume.education {
            let degree = join_present(&[&entry.degree, &entry.field], ", ");
            md.push_str(&format!("### {}\n", or_placeholder(&entry.school)));
            push_line(&mut md, &degree);
            push_line(&mut md, &date_range(&entry.start_date, &entry.end_date));
            if !entry.gpa.trim().is_empty() {
                md.push_str(&format!("- **GPA:** {}\n", entry.gpa.trim()));
            }
            md.push('\n');
        }
    }

    if !resume.experience.is_empty() {
        md.push_str("## Experience\n\n");
        for entry in &resume.experience {
            let heading = join_present(&[&entry.position, &entry.company], " — ");
            md.push_str(&format!("### {}\n", or_placeholder(&heading)));
            push_line(&mut md, &entry.location);
            push_line(&mut md, &date_range(&entry.start_date, &entry.end_date));
            if !entry.description.trim().is_empty() {
                md.push('\n');
                md.push_str(entry.description.trim());
                md.push('\n');
            }
            md.push('\n');
        }
    }

    if !resume.projects.is_empty() {
        md.push_str("## Projects\n\n");
        for entry in &resume.projects {
            let name = or_placeholder(&entry.name);
            if entry.link.trim().is_empty() {
                md.push_str(&format!("### {name}\n"));
            } else {
                md.push_str(&format!("### [{name}]({})\n", entry.link.trim()));
            }
            if !entry.technologies.trim().is_empty() {
                md.push_str(&format!("- **Tech:** {}\n", entry.technologies.trim()));
            }
            push_line(&mut md, &entry.description);
            md.push('\n');
        }
    }

    let skills: Vec<&str> = resume
        .skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !skills.is_empty() {
        md.push_str("## Skills\n\n");
        md.push_str(&skills.join(", "));
        md.push('\n');
    }

    md
}

fn join_present(parts: &[&String], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => format!("{start} – Present"),
        ("", end) => end.to_string(),
        (start, end) => format!("{start} – {end}"),
    }
}

fn push_line(md: &mut String, line: &str) {
    let line = line.trim();
    if !line.is_empty() {
        md.push_str(line);
        md.push('\n');
    }
}

fn or_placeholder(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        "Untitled"
    } else {
        value
    }
}
