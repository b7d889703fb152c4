// The two batch stages. `process` reads the survey and writes the consolidated
// JSON; `prompts` reads that JSON and writes one prompt file per participant.

pub mod process;
pub mod prompts;

#[cfg(test)]
pub(crate) mod test_support;

pub use process::run_process;
pub use prompts::run_prompts;
