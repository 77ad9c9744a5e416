// Prompt templates for the four guidance capabilities.
// Placeholders are `{name}` and are filled with `fill`.

/// Chat prompt. Replace: {profile_json}, {history}, {message}, {language_instruction}
pub const CHAT_PROMPT_TEMPLATE: &str = r#"USER PROFILE (may be empty):
{profile_json}

RECENT CONVERSATION:
{history}

USER MESSAGE:
{message}

Reply as a career counselor. Keep it under 200 words.
{language_instruction}"#;

/// Resume analysis prompt. Replace: {resume_text}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Analyze this resume and extract key information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "skills": ["Python", "SQL"],
  "experience_years": 3,
  "education_level": "Bachelor's Degree",
  "key_strengths": ["Python"],
  "improvement_areas": ["Portfolio development"],
  "career_level": "entry | mid | senior",
  "industries": ["Technology"],
  "score": 75
}

RULES:
- `experience_years` is a whole number, 0 or more
- `career_level` is exactly one of "entry", "mid", "senior"
- `score` is an integer from 0 to 100 rating overall resume quality
- `skills` must not contain duplicates

RESUME TEXT:
{resume_text}"#;

/// Recommendation prompt. Replace: {skills}, {profile_json}
pub const RECOMMEND_PROMPT_TEMPLATE: &str = r#"Recommend up to 5 careers for this user.

DECLARED SKILLS: {skills}

USER PROFILE:
{profile_json}

Return a JSON object with this EXACT schema:
{
  "recommendations": [
    {
      "title": "Machine Learning Engineer",
      "match_confidence": 0.87,
      "description": "One or two sentences on why it fits",
      "required_skills": ["Python", "PyTorch"],
      "salary_range": "$110k-$160k",
      "growth_outlook": "High",
      "next_steps": ["Complete an ML specialization"]
    }
  ]
}

RULES:
- `match_confidence` is a number between 0 and 1
- order by `match_confidence`, best first
- at least 1 and at most 5 recommendations"#;

/// Roadmap prompt. Replace: {career_name}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Create a learning roadmap for becoming a {career_name}.

Return a JSON object with this EXACT schema:
{
  "career": "{career_name}",
  "total_duration": "9-12 months",
  "phases": [
    {
      "phase": 1,
      "title": "Foundations",
      "duration": "2-3 months",
      "skills": ["..."],
      "projects": ["..."],
      "resources": ["..."]
    }
  ]
}

RULES:
- 3 to 6 phases, in the order they should be completed
- `phase` numbers start at 1 and increase by 1"#;

/// Fills `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never re-scanned, so user text containing `{message}`
/// or similar stays literal. Braces that do not form a known placeholder (the
/// JSON examples in the templates) are copied through unchanged.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find(|(name, _)| {
            tail.strip_prefix(*name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
