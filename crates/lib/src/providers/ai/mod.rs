pub mod chat;

use crate::errors::SiteError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a text-generation provider.
///
/// Implementations send a single user prompt and return the model's raw reply.
/// Interpreting the reply is left to the caller.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    async fn generate(&self, prompt: &str) -> Result<String, SiteError>;
}

dyn_clone::clone_trait_object!(AiProvider);
