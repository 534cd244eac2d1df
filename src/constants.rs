// API Constants
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_API_VERSION: &str = "v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const API_KEY_HEADER: &str = "x-goog-api-key";
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Value shipped in sample `.env` files; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

// Chat Constants
pub const MAX_PREVIOUS_QUESTIONS: usize = 10;
pub const POINTS_PER_QUESTION: u32 = 5;

pub const QUICK_ASK: [&str; 7] = [
    "Give me a diet plan for my condition",
    "What sports or exercises are safe for me?",
    "Daily routine suggestions",
    "Foods to avoid",
    "Tips to reduce symptoms",
    "What should I ask my doctor?",
    "Safe home remedies",
];

pub const SURGERY_SUGGESTIONS: [&str; 4] = [
    "Gallbladder removal",
    "C-section",
    "Appendix removal",
    "Other",
];
