// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowcanvas and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::future::{ready, Future};
use std::pin::Pin;

use tokio::sync::{mpsc, oneshot};

use super::{CreationError, CreationFailure, CreationRequest, ProviderPayload};

pub type ProviderFuture =
    Pin<Box<dyn Future<Output = Result<ProviderPayload, CreationError>> + Send + 'static>>;

/// Supplies the identity/details of a component that needs outside negotiation before it can
/// be placed (choosing a processor type, entering a remote URL).
pub trait CreationProvider: Send {
    fn request(&self, request: CreationRequest) -> ProviderFuture;
}

impl<F> CreationProvider for F
where
    F: Fn(CreationRequest) -> ProviderFuture + Send,
{
    fn request(&self, request: CreationRequest) -> ProviderFuture {
        self(request)
    }
}

/// A provider that hands each request to whoever holds the matching [`PendingCreations`].
#[derive(Debug, Clone)]
pub struct ChannelProvider {
    sender: mpsc::UnboundedSender<PendingCreation>,
}

impl ChannelProvider {
    pub fn new() -> (Self, PendingCreations) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, PendingCreations { receiver })
    }
}

impl CreationProvider for ChannelProvider {
    fn request(&self, request: CreationRequest) -> ProviderFuture {
        let kind = request.kind;
        let (reply, answer) = oneshot::channel();
        if self.sender.send(PendingCreation { request, reply }).is_err() {
            return Box::pin(ready(Err(CreationError::Failed(CreationFailure::ProviderClosed {
                kind,
            }))));
        }
        Box::pin(async move {
            match answer.await {
                Ok(result) => result,
                // Dropping the pending request without answering counts as a user cancel.
                Err(_) => Err(CreationError::Cancelled),
            }
        })
    }
}

#[derive(Debug)]
pub struct PendingCreations {
    receiver: mpsc::UnboundedReceiver<PendingCreation>,
}

impl PendingCreations {
    pub async fn next(&mut self) -> Option<PendingCreation> {
        self.receiver.recv().await
    }

    pub fn try_next(&mut self) -> Option<PendingCreation> {
        self.receiver.try_recv().ok()
    }
}

/// One outstanding creation waiting for an answer.
#[derive(Debug)]
pub struct PendingCreation {
    request: CreationRequest,
    reply: oneshot::Sender<Result<ProviderPayload, CreationError>>,
}

impl PendingCreation {
    pub fn request(&self) -> &CreationRequest {
        &self.request
    }

    /// Returns `false` when the creator stopped waiting.
    pub fn resolve(self, payload: ProviderPayload) -> bool {
        self.reply.send(Ok(payload)).is_ok()
    }

    pub fn fail(self, reason: impl Into<String>) -> bool {
        self.reply
            .send(Err(CreationError::Failed(CreationFailure::Provider { reason: reason.into() })))
            .is_ok()
    }

    pub fn cancel(self) -> bool {
        self.reply.send(Err(CreationError::Cancelled)).is_ok()
    }
}
