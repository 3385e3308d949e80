use std::marker::PhantomData;

use tracing::debug;

use crate::bind::Bind;
use crate::env::Source;
use crate::error::EnvbindError;
use crate::types::{Companion, DefaultCompanion};

/// Entry point for composing sources over one destination.
pub struct Envbind;

impl Envbind {
    pub fn builder<C: Bind>() -> EnvbindBuilder<C> {
        EnvbindBuilder::new()
    }
}

/// Builder applying a list of sources to a destination struct.
///
/// Sources run in the order they were added. Every source is sparse: it only
/// touches the fields whose keys it has, so later sources override earlier
/// ones key by key and unset keys fall through.
pub struct EnvbindBuilder<C: Bind> {
    sources: Vec<Box<dyn Source>>,
    companion: Box<dyn Companion>,
    _phantom: PhantomData<C>,
}

impl<C: Bind> EnvbindBuilder<C> {
    fn new() -> Self {
        Self {
            sources: Vec::new(),
            companion: Box::new(DefaultCompanion),
            _phantom: PhantomData,
        }
    }

    /// Append a source. Later sources take precedence.
    pub fn add_source(mut self, source: impl Source + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Replace the field policy (default: [`DefaultCompanion`]).
    pub fn companion(mut self, companion: impl Companion + 'static) -> Self {
        self.companion = Box::new(companion);
        self
    }

    /// Decode all sources into an existing value, keeping what no source sets.
    pub fn parse(mut self, config: &mut C) -> Result<(), EnvbindError> {
        if self.sources.is_empty() {
            return Err(EnvbindError::NoSources);
        }
        debug!(sources = self.sources.len(), "binding configuration");
        for source in &mut self.sources {
            let loaded = source.parse(self.companion.as_ref(), config)?;
            debug!(tag = source.key_tag(), loaded, "source applied");
        }
        Ok(())
    }

    /// Decode all sources into `C::default()`.
    pub fn load(self) -> Result<C, EnvbindError>
    where
        C: Default,
    {
        let mut config = C::default();
        self.parse(&mut config)?;
        Ok(config)
    }
}
