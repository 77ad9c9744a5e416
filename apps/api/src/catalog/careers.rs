/// A career in the static dataset used for chat citations and similarity matching.
#[derive(Debug)]
pub struct CareerProfile {
    pub title: &'static str,
    pub description: &'static str,
    pub skills: &'static [&'static str],
    pub courses: &'static [&'static str],
}

impl CareerProfile {
    /// Text embedded for similarity matching.
    pub fn matching_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description,
            self.skills.join(" ")
        )
    }
}

pub const CAREERS: &[CareerProfile] = &[
    CareerProfile {
        title: "Data Scientist",
        description: "Builds statistical and machine learning models to answer business questions from data.",
        skills: &["python", "ml", "sql", "statistics", "pandas"],
        courses: &["Intro ML", "Statistics for Data Science"],
    },
    CareerProfile {
        title: "ML Engineer",
        description: "Trains, deploys and monitors machine learning models in production systems.",
        skills: &["pytorch", "mlops", "python", "docker", "kubernetes"],
        courses: &["MLOps Basics", "Deep Learning Specialization"],
    },
    CareerProfile {
        title: "Data Analyst",
        description: "Turns raw data into dashboards, reports and insights for decision makers.",
        skills: &["sql", "excel", "tableau", "bi", "statistics"],
        courses: &["Mode SQL", "Storytelling with Data"],
    },
    CareerProfile {
        title: "Software Engineer",
        description: "Designs, builds and maintains reliable software systems and services.",
        skills: &["java", "python", "git", "algorithms", "testing"],
        courses: &["CS50", "Clean Code Fundamentals"],
    },
    CareerProfile {
        title: "Full Stack Developer",
        description: "Builds web applications end to end, from user interface to backend APIs and databases.",
        skills: &["javascript", "react", "node", "html", "css"],
        courses: &["The Odin Project", "Full Stack Open"],
    },
    CareerProfile {
        title: "Cloud Engineer",
        description: "Designs and operates cloud infrastructure, automation and deployment pipelines.",
        skills: &["aws", "terraform", "docker", "linux", "networking"],
        courses: &["AWS Cloud Practitioner", "Terraform Up and Running"],
    },
    CareerProfile {
        title: "UX Designer",
        description: "Researches user needs and designs intuitive interfaces and product experiences.",
        skills: &["figma", "prototyping", "research", "wireframing", "accessibility"],
        courses: &["Google UX Design Certificate"],
    },
    CareerProfile {
        title: "Cybersecurity Analyst",
        description: "Monitors systems for threats, investigates incidents and hardens infrastructure.",
        skills: &["networking", "siem", "linux", "python", "forensics"],
        courses: &["CompTIA Security+", "TryHackMe Pre-Security"],
    },
    CareerProfile {
        title: "Product Manager",
        description: "Defines product strategy and roadmap, aligning users, business and engineering.",
        skills: &["roadmapping", "analytics", "communication", "prioritization", "agile"],
        courses: &["Product Management Fundamentals"],
    },
    CareerProfile {
        title: "Mobile Developer",
        description: "Builds native and cross-platform applications for phones and tablets.",
        skills: &["kotlin", "swift", "flutter", "react", "git"],
        courses: &["Android Basics with Compose", "iOS App Development"],
    },
];

/// Careers a message mentions, by title or by skill keyword.
pub fn search(message: &str, limit: usize) -> Vec<&'static CareerProfile> {
    let lowered = message.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    CAREERS
        .iter()
        .filter(|c| {
            lowered.contains(&c.title.to_lowercase())
                || c.skills.iter().any(|s| tokens.contains(s))
        })
        .take(limit)
        .collect()
}
