use thiserror::Error;

use crate::{
    error::ClientError,
    gateway::Gateway,
    services::bank::{create_link_token, exchange_public_token},
};

/// Phase of the bank-link token flow.
///
/// Only ephemeral tokens ever pass through the client: the short-lived link
/// token handed to the vendor's hosted widget, and the public token the
/// widget yields on success. The durable access credential stays
/// server-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkPhase {
    NoToken,
    TokenIssued,
    WidgetOpen,
    Exchanged,
    Abandoned,
}

impl LinkPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::NoToken => "no token",
            Self::TokenIssued => "token issued",
            Self::WidgetOpen => "widget open",
            Self::Exchanged => "exchanged",
            Self::Abandoned => "abandoned",
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::NoToken | Self::Exchanged | Self::Abandoned)
    }
}

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("cannot {action} while {}", from.label())]
    Phase {
        from: LinkPhase,
        action: &'static str,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Driver for the link flow against the backend.
///
/// no-token → token-issued → widget-open → exchanged | abandoned.
/// Re-entering after a terminal phase requires a fresh link token.
#[derive(Debug)]
pub struct LinkFlow {
    gateway: Gateway,
    phase: LinkPhase,
    link_token: Option<String>,
}

impl LinkFlow {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            phase: LinkPhase::NoToken,
            link_token: None,
        }
    }

    pub fn phase(&self) -> LinkPhase {
        self.phase
    }

    /// The token to hand to the hosted widget, while one is live.
    pub fn link_token(&self) -> Option<&str> {
        self.link_token.as_deref()
    }

    /// Fetch a fresh link token from the backend.
    pub async fn start(&mut self) -> Result<&str, LinkError> {
        if !self.phase.is_terminal() {
            return Err(LinkError::Phase {
                from: self.phase,
                action: "start",
            });
        }
        let token = create_link_token(&self.gateway).await?;
        self.link_token = Some(token);
        self.phase = LinkPhase::TokenIssued;
        Ok(self.link_token.as_deref().unwrap_or_default())
    }

    /// The widget reported ready; it auto-opens exactly once.
    pub fn widget_ready(&mut self) -> Result<(), LinkError> {
        if self.phase != LinkPhase::TokenIssued {
            return Err(LinkError::Phase {
                from: self.phase,
                action: "open the widget",
            });
        }
        self.phase = LinkPhase::WidgetOpen;
        Ok(())
    }

    /// Success callback: exchange the public token via the backend for a
    /// durable access credential stored server-side.
    pub async fn complete(&mut self, public_token: &str) -> Result<(), LinkError> {
        if self.phase != LinkPhase::WidgetOpen {
            return Err(LinkError::Phase {
                from: self.phase,
                action: "exchange the public token",
            });
        }
        exchange_public_token(&self.gateway, public_token).await?;
        self.link_token = None;
        self.phase = LinkPhase::Exchanged;
        Ok(())
    }

    /// Exit callback: discard the link token.
    pub fn abandon(&mut self) -> Result<(), LinkError> {
        if !matches!(self.phase, LinkPhase::TokenIssued | LinkPhase::WidgetOpen) {
            return Err(LinkError::Phase {
                from: self.phase,
                action: "abandon",
            });
        }
        self.link_token = None;
        self.phase = LinkPhase::Abandoned;
        Ok(())
    }
}
