// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Asynchronous component creation.
//!
//! Funnels are created on the spot. Processors and remote process groups wait for the provider
//! registered for their kind. The returned futures own everything they need, so a pending
//! creation is unaffected by selection changes made while it waits.

mod provider;

use std::collections::BTreeMap;
use std::fmt;
use std::future::{ready, Future};
use std::pin::Pin;

use tracing::{debug, warn};
use url::Url;

use crate::model::{ComponentKind, ElementDetails, ElementId, IdError, IdSource, Position};

pub use provider::{
    ChannelProvider, CreationProvider, PendingCreation, PendingCreations, ProviderFuture,
};

pub type CreationFuture =
    Pin<Box<dyn Future<Output = Result<CreatedEntity, CreationError>> + Send + 'static>>;

/// What a provider is asked to negotiate.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationRequest {
    pub kind: ComponentKind,
    pub position: Position,
    /// Id the component gets unless the provider supplies its own.
    pub proposed_id: ElementId,
}

/// What a provider answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderPayload {
    /// A processor chosen by the user, identified by the provider.
    Identified { id: String, component_type: Option<String> },
    /// The remote instance a remote process group points at.
    TargetUri(String),
}

impl ProviderPayload {
    pub fn identified(id: impl Into<String>) -> Self {
        Self::Identified { id: id.into(), component_type: None }
    }

    pub fn target_uri(uri: impl Into<String>) -> Self {
        Self::TargetUri(uri.into())
    }
}

/// A created component, ready to be placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntity {
    pub id: ElementId,
    pub kind: ComponentKind,
    pub details: ElementDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationError {
    Cancelled,
    Failed(CreationFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationFailure {
    Provider { reason: String },
    ProviderClosed { kind: ComponentKind },
    NoProvider { kind: ComponentKind },
    NotPlaceable { kind: ComponentKind },
    UnexpectedPayload { kind: ComponentKind },
    InvalidId { value: String, source: IdError },
    InvalidTargetUri { uri: String, source: url::ParseError },
    UnsupportedScheme { uri: String },
}

impl fmt::Display for CreationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("creation cancelled"),
            Self::Failed(failure) => write!(f, "creation failed: {failure}"),
        }
    }
}

impl std::error::Error for CreationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Cancelled => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

impl fmt::Display for CreationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider { reason } => write!(f, "provider reported: {reason}"),
            Self::ProviderClosed { kind } => write!(f, "{kind} provider is no longer listening"),
            Self::NoProvider { kind } => write!(f, "no provider registered for {kind}"),
            Self::NotPlaceable { kind } => write!(f, "{kind} cannot be placed at a position"),
            Self::UnexpectedPayload { kind } => {
                write!(f, "provider answered with a payload that does not fit {kind}")
            }
            Self::InvalidId { value, source } => write!(f, "invalid id '{value}': {source}"),
            Self::InvalidTargetUri { uri, source } => {
                write!(f, "invalid target uri '{uri}': {source}")
            }
            Self::UnsupportedScheme { uri } => {
                write!(f, "target uri '{uri}' must use http or https")
            }
        }
    }
}

impl std::error::Error for CreationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidId { source, .. } => Some(source),
            Self::InvalidTargetUri { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Per-kind provider registry plus the id source for new components.
#[derive(Default)]
pub struct CreationRegistry {
    providers: BTreeMap<ComponentKind, Box<dyn CreationProvider>>,
    ids: IdSource,
}

impl fmt::Debug for CreationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreationRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .field("ids", &self.ids)
            .finish()
    }
}

impl CreationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `provider` for `kind`, returning the provider it replaced.
    pub fn register(
        &mut self,
        kind: ComponentKind,
        provider: impl CreationProvider + 'static,
    ) -> Option<Box<dyn CreationProvider>> {
        self.providers.insert(kind, Box::new(provider))
    }

    pub fn unregister(&mut self, kind: ComponentKind) -> Option<Box<dyn CreationProvider>> {
        self.providers.remove(&kind)
    }

    pub fn has_provider(&self, kind: ComponentKind) -> bool {
        self.providers.contains_key(&kind)
    }

    pub fn create(&mut self, kind: ComponentKind, position: Position) -> CreationFuture {
        self.create_avoiding(kind, position, |_| false)
    }

    /// Like [`CreationRegistry::create`], never proposing an id for which `taken` is true.
    pub fn create_avoiding(
        &mut self,
        kind: ComponentKind,
        position: Position,
        taken: impl Fn(&ElementId) -> bool,
    ) -> CreationFuture {
        match kind {
            ComponentKind::Connection => {
                fail_now(CreationError::Failed(CreationFailure::NotPlaceable { kind }))
            }
            ComponentKind::Funnel => {
                let id = self.ids.next_unused(kind.as_str(), taken);
                debug!(kind = %kind, element_id = %id, "created without negotiation");
                Box::pin(ready(Ok(CreatedEntity { id, kind, details: ElementDetails::None })))
            }
            ComponentKind::Processor | ComponentKind::RemoteProcessGroup => {
                let Some(provider) = self.providers.get(&kind) else {
                    return fail_now(CreationError::Failed(CreationFailure::NoProvider { kind }));
                };
                let proposed_id = self.ids.next_unused(kind.as_str(), taken);
                let pending = provider.request(CreationRequest {
                    kind,
                    position,
                    proposed_id: proposed_id.clone(),
                });
                debug!(kind = %kind, "waiting for creation provider");
                Box::pin(async move {
                    let result = pending
                        .await
                        .and_then(|payload| entity_from_payload(kind, proposed_id, payload));
                    match &result {
                        Ok(entity) => debug!(kind = %kind, element_id = %entity.id, "created"),
                        Err(CreationError::Cancelled) => debug!(kind = %kind, "creation cancelled"),
                        Err(err) => warn!(kind = %kind, "{err}"),
                    }
                    result
                })
            }
        }
    }
}

fn fail_now(err: CreationError) -> CreationFuture {
    warn!("{err}");
    Box::pin(ready(Err(err)))
}

fn entity_from_payload(
    kind: ComponentKind,
    proposed_id: ElementId,
    payload: ProviderPayload,
) -> Result<CreatedEntity, CreationError> {
    match (kind, payload) {
        (ComponentKind::Processor, ProviderPayload::Identified { id, component_type }) => {
            let id = ElementId::new(id.clone()).map_err(|source| {
                CreationError::Failed(CreationFailure::InvalidId { value: id, source })
            })?;
            Ok(CreatedEntity { id, kind, details: ElementDetails::Processor { component_type } })
        }
        (ComponentKind::RemoteProcessGroup, ProviderPayload::TargetUri(uri)) => {
            let parsed = Url::parse(uri.trim()).map_err(|source| {
                CreationError::Failed(CreationFailure::InvalidTargetUri {
                    uri: uri.clone(),
                    source,
                })
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(CreationError::Failed(CreationFailure::UnsupportedScheme { uri }));
            }
            Ok(CreatedEntity {
                id: proposed_id,
                kind,
                details: ElementDetails::RemoteProcessGroup { target_uri: parsed.to_string() },
            })
        }
        _ => Err(CreationError::Failed(CreationFailure::UnexpectedPayload { kind })),
    }
}
