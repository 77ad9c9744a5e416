//! Chat: free-text counseling replies.
//!
//! Model path: the reply is the model's text, trimmed. Fallback: the message is
//! classified into a fixed bucket and answered from a per-language template.

use serde::{Deserialize, Serialize};

use crate::catalog::careers;
use crate::errors::AppError;
use crate::guidance::default_user_id;
use crate::guidance::extractor::ExtractionFailure;
use crate::guidance::policy::{Capability, CapabilityKind};
use crate::guidance::prompts::{fill, CHAT_PROMPT_TEMPLATE};
use crate::llm_client::prompts::{COUNSELOR_SYSTEM, LANGUAGE_INSTRUCTION};
use crate::models::chat::{ChatSource, ChatTurn};
use crate::models::profile::UserProfile;

/// Careers cited per reply.
const MAX_SOURCES: usize = 3;
/// Most recent turns forwarded to the model.
const HISTORY_WINDOW: usize = 6;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub sources: Vec<ChatSource>,
}

// ────────────────────────────────────────────────────────────────────────────
// Language
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
}

impl Language {
    /// Primary subtag, case-insensitive. Anything unrecognised is English.
    pub fn from_code(code: Option<&str>) -> Self {
        let primary = code
            .unwrap_or_default()
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "es" => Language::Es,
            "fr" => Language::Fr,
            _ => Language::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
        }
    }

    fn greeting(self, name: Option<&str>) -> String {
        match (self, name) {
            (Language::En, Some(n)) => format!("Hi {n}!"),
            (Language::En, None) => "Hi there!".to_string(),
            (Language::Es, Some(n)) => format!("¡Hola, {n}!"),
            (Language::Es, None) => "¡Hola!".to_string(),
            (Language::Fr, Some(n)) => format!("Bonjour {n} !"),
            (Language::Fr, None) => "Bonjour !".to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Bucket classification
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBucket {
    Career,
    Learning,
    Resume,
    Interview,
    Salary,
    General,
}

/// Checked top to bottom; the first bucket with a matching keyword wins.
const BUCKET_RULES: &[(ChatBucket, &[&str])] = &[
    (
        ChatBucket::Career,
        &["career", "job", "role", "profession", "occupation"],
    ),
    (
        ChatBucket::Learning,
        &["skill", "learn", "course", "study", "certif", "training", "tutorial"],
    ),
    (ChatBucket::Resume, &["resume", "cv", "portfolio", "linkedin"]),
    (ChatBucket::Interview, &["interview", "recruiter", "hiring"]),
    (
        ChatBucket::Salary,
        &["salary", "pay", "compensation", "negotiat", "wage"],
    ),
];

/// A keyword matches a token when the token starts with it ("careers" ⇒ "career").
pub fn classify(message: &str) -> ChatBucket {
    let lowered = message.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    BUCKET_RULES
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|kw| tokens.iter().any(|t| t.starts_with(kw)))
        })
        .map(|(bucket, _)| *bucket)
        .unwrap_or(ChatBucket::General)
}

fn template(bucket: ChatBucket, lang: Language) -> &'static str {
    use ChatBucket::*;
    use Language::*;
    match (bucket, lang) {
        (Career, En) => "Choosing a career path starts with what energizes you. List the problems you enjoy solving, compare them with roles like software engineering, data analysis or product management, and try a small project in each before committing.",
        (Career, Es) => "Elegir una carrera empieza por lo que te motiva. Anota los problemas que disfrutas resolver, compáralos con roles como ingeniería de software, análisis de datos o gestión de producto, y prueba un pequeño proyecto en cada uno antes de decidir.",
        (Career, Fr) => "Choisir une carrière commence par ce qui vous motive. Listez les problèmes que vous aimez résoudre, comparez-les à des métiers comme le développement logiciel, l'analyse de données ou la gestion de produit, et testez un petit projet dans chacun avant de vous engager.",
        (Learning, En) => "To build a new skill, pick one focused course, practice daily for a few weeks, and finish with a project you can show. Consistency beats intensity.",
        (Learning, Es) => "Para desarrollar una nueva habilidad, elige un curso concreto, practica a diario durante unas semanas y termina con un proyecto que puedas mostrar. La constancia vale más que la intensidad.",
        (Learning, Fr) => "Pour acquérir une nouvelle compétence, choisissez un cours ciblé, pratiquez chaque jour pendant quelques semaines et terminez par un projet à montrer. La régularité l'emporte sur l'intensité.",
        (Resume, En) => "A strong resume leads with measurable results. Keep it to one page, start each bullet with an action verb, quantify your impact, and link a portfolio with two or three polished projects.",
        (Resume, Es) => "Un buen currículum destaca resultados medibles. Mantenlo en una página, empieza cada punto con un verbo de acción, cuantifica tu impacto y enlaza un portafolio con dos o tres proyectos cuidados.",
        (Resume, Fr) => "Un bon CV met en avant des résultats mesurables. Tenez-vous à une page, commencez chaque point par un verbe d'action, chiffrez votre impact et ajoutez un portfolio avec deux ou trois projets soignés.",
        (Interview, En) => "For interviews, research the company, prepare three stories using the STAR method, practice common technical questions aloud, and bring two thoughtful questions for the interviewer.",
        (Interview, Es) => "Para las entrevistas, investiga la empresa, prepara tres historias con el método STAR, practica en voz alta preguntas técnicas comunes y lleva dos preguntas bien pensadas para el entrevistador.",
        (Interview, Fr) => "Pour les entretiens, renseignez-vous sur l'entreprise, préparez trois récits avec la méthode STAR, entraînez-vous à voix haute sur les questions techniques courantes et prévoyez deux questions pertinentes pour le recruteur.",
        (Salary, En) => "Before negotiating salary, research market ranges for your role and location, anchor on the value you bring, and consider the whole package: bonus, equity, learning budget and flexibility.",
        (Salary, Es) => "Antes de negociar el salario, investiga los rangos de mercado para tu puesto y ubicación, apóyate en el valor que aportas y considera el paquete completo: bonos, acciones, presupuesto de formación y flexibilidad.",
        (Salary, Fr) => "Avant de négocier votre salaire, renseignez-vous sur les fourchettes du marché pour votre poste et votre région, appuyez-vous sur la valeur que vous apportez et considérez l'ensemble : prime, actions, budget formation et flexibilité.",
        (General, En) => "I can help you explore careers, plan a learning roadmap, review your resume, prepare for interviews or think through salary questions. What would you like to start with?",
        (General, Es) => "Puedo ayudarte a explorar carreras, planificar una ruta de aprendizaje, revisar tu currículum, preparar entrevistas o pensar en temas de salario. ¿Por dónde quieres empezar?",
        (General, Fr) => "Je peux vous aider à explorer des carrières, planifier un parcours d'apprentissage, relire votre CV, préparer des entretiens ou réfléchir à votre salaire. Par quoi voulez-vous commencer ?",
    }
}

fn sources_for(message: &str) -> Vec<ChatSource> {
    careers::search(message, MAX_SOURCES)
        .into_iter()
        .map(|c| ChatSource {
            title: c.title.to_string(),
            skills: c.skills.iter().map(|s| s.to_string()).collect(),
            courses: c.courses.iter().map(|s| s.to_string()).collect(),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Capability
// ────────────────────────────────────────────────────────────────────────────

pub struct ChatCapability;

impl Capability for ChatCapability {
    type Input = ChatRequest;
    type Output = ChatReply;

    fn kind(&self) -> CapabilityKind {
        CapabilityKind::Chat
    }

    fn validate(&self, input: &ChatRequest) -> Result<(), AppError> {
        if input.message.trim().is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }
        Ok(())
    }

    fn system_prompt(&self) -> &'static str {
        COUNSELOR_SYSTEM
    }

    fn prompt(&self, input: &ChatRequest) -> String {
        let profile_json = input
            .user_profile
            .as_ref()
            .and_then(|p| serde_json::to_string_pretty(p).ok())
            .unwrap_or_else(|| "{}".to_string());

        let skip = input.history.len().saturating_sub(HISTORY_WINDOW);
        let history = if input.history.is_empty() {
            "(none)".to_string()
        } else {
            input.history[skip..]
                .iter()
                .map(|t| format!("{}: {}", t.role.as_str(), t.text))
                .collect::<Vec<_>>()
                .join("\n")
        };

        let lang = Language::from_code(input.lang.as_deref());
        let language_instruction = match lang {
            Language::En => String::new(),
            other => fill(LANGUAGE_INSTRUCTION, &[("lang", other.code())]),
        };

        fill(
            CHAT_PROMPT_TEMPLATE,
            &[
                ("profile_json", profile_json.as_str()),
                ("history", history.as_str()),
                ("message", input.message.trim()),
                ("language_instruction", language_instruction.as_str()),
            ],
        )
    }

    fn interpret(&self, raw: &str, input: &ChatRequest) -> Result<ChatReply, ExtractionFailure> {
        let reply = raw.trim();
        if reply.is_empty() {
            return Err(ExtractionFailure::Nonconforming("empty reply".to_string()));
        }
        Ok(ChatReply {
            reply: reply.to_string(),
            sources: sources_for(&input.message),
        })
    }

    fn fallback(&self, input: &ChatRequest) -> Result<ChatReply, AppError> {
        let bucket = classify(&input.message);
        let lang = Language::from_code(input.lang.as_deref());
        let name = input.user_profile.as_ref().and_then(|p| p.name());

        let sources = match bucket {
            ChatBucket::Career => sources_for(&input.message),
            _ => Vec::new(),
        };

        Ok(ChatReply {
            reply: format!("{} {}", lang.greeting(name), template(bucket, lang)),
            sources,
        })
    }
}
