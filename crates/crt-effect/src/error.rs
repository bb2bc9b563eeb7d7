use thiserror::Error;

/// Construction-time failures of the effect.
///
/// All of these are environment-level (unsupported hardware or driver) and
/// none are transient, so there is no retry path: the caller either falls
/// back to unfiltered rendering or stops.
#[derive(Debug, Error)]
pub enum EffectError {
    /// No usable surface, adapter, or device could be obtained.
    #[error("no compatible GPU context available: {0}")]
    ContextUnavailable(String),

    /// One shader stage failed validation; the diagnostic log is preserved
    /// for debugging.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    /// Both stages compiled but the pipeline could not be created from them.
    #[error("shader program failed to link: {log}")]
    ProgramLink { log: String },
}
