//! Deterministic prompt construction for release note generation.
//!
//! The prompt is a pure function of the project and selected commits so
//! repeated requests differ only by the model's sampling. Section headers
//! are fixed; the instructions forbid hashes, filenames, and other
//! implementation detail from leaking into customer-facing output.

use crate::domain::{Project, SelectedCommit};

/// Fallback note title when the caller supplies none.
pub const DEFAULT_NOTE_TITLE: &str = "Latest Updates";

/// System instruction reinforcing tone, sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "You are a professional technical writer specializing in \
     customer-facing release notes. Always focus on user benefits and use clear, engaging \
     language.";

/// Build the user prompt for one generation request.
pub fn build_prompt(project: &Project, commits: &[SelectedCommit], title: Option<&str>) -> String {
    let commit_lines = commits
        .iter()
        .map(|commit| {
            format!(
                "\u{2022} {} ({} - {})\n  Changes: {}",
                commit.message,
                commit.author_name,
                commit.short_sha(),
                commit.change_summary()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a professional technical writer creating customer-facing release notes for a \
         SaaS product called \"{project_name}\".\n\n\
         Transform the following commits into engaging, customer-friendly release notes that \
         highlight user benefits and improvements.\n\n\
         Repository: {repository}\n\
         Time Period: Recent commits\n\
         Total Commits: {count}\n\n\
         COMMIT DATA:\n\
         {commit_lines}\n\n\
         REQUIREMENTS:\n\
         - Write for end users, not developers\n\
         - Focus on user benefits and improvements\n\
         - Group related changes together\n\
         - Use clear, engaging language\n\
         - Avoid technical jargon\n\
         - Structure with clear sections (New Features, Improvements, Bug Fixes, etc.)\n\
         - Keep it concise but informative\n\
         - Use markdown formatting\n\
         - Don't mention commit hashes, file names, or technical implementation details\n\n\
         FORMAT:\n\
         # Release Notes - {title}\n\n\
         ## New Features\n\
         [List new features with user benefits]\n\n\
         ## Improvements\n\
         [List enhancements and optimizations]\n\n\
         ## Bug Fixes\n\
         [List bug fixes and stability improvements]\n\n\
         ## Other Updates\n\
         [Any other notable changes]\n\n\
         Generate professional, customer-focused release notes now:",
        project_name = project.name,
        repository = project.repository,
        count = commits.len(),
        title = title.unwrap_or(DEFAULT_NOTE_TITLE),
    )
}
