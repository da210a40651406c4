//! Translation seam and the two-hop label chain

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of one translation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    /// Source language as resolved by the service
    pub src: String,
    /// Destination language as resolved by the service
    pub dest: String,
}

/// Machine translation service.
///
/// `src` of `None` asks the service to detect the source language.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, src: Option<&str>, dest: &str) -> Result<Translation>;
}

/// Both hops for one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopPair {
    pub first: Translation,
    pub second: Translation,
}

/// One hop.
pub async fn translate_hop<T>(translator: &T, text: &str, src: Option<&str>, dest: &str) -> Result<Translation>
where
    T: Translator + ?Sized,
{
    let translation = translator.translate(text, src, dest).await?;
    debug!("{:?} -> {:?} ({} -> {})", text, translation.text, translation.src, translation.dest);
    Ok(translation)
}

/// Translate `label` into `intermediate`, then translate that result into
/// `final_language`, declaring the first hop's destination as the source.
pub async fn translate_label<T>(
    translator: &T,
    label: &str,
    intermediate: &str,
    final_language: &str,
) -> Result<HopPair>
where
    T: Translator + ?Sized,
{
    let first = translate_hop(translator, label, None, intermediate).await?;
    let second = translate_hop(translator, &first.text, Some(first.dest.as_str()), final_language).await?;
    Ok(HopPair { first, second })
}
