//! Read-only identity card view model.
//!
//! An [`IdCard`] is what the public profile route renders. It is assembled
//! from a record with [`IdCardBuilder`] and carries its own QR code, so the
//! HTML and JSON renderings never have to reach back into the repository.

use serde::Serialize;

use crate::entity::EntityKind;
use crate::error::CoreError;
use crate::profile::{profile_path, ServingOrigin};
use crate::qr;
use crate::types::{EntityId, Timestamp};

/// Brand line printed above every card.
pub const ISSUER: &str = "SchoolERP Pro";

/// A labelled value on the card. Only non-blank values are ever added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRow {
    pub label: &'static str,
    pub value: String,
}

/// A titled group of rows ("School Details", "Parent Information", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSection {
    pub title: &'static str,
    pub rows: Vec<CardRow>,
}

/// A related person shown with a small photo, e.g. a student's parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonTile {
    pub role: &'static str,
    pub name: String,
    pub photo_url: Option<String>,
    /// Fallback avatar letter when there is no photo.
    pub initial: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdCard {
    pub kind: EntityKind,
    pub id: EntityId,
    /// Upper-cased id, as printed on the card.
    pub display_id: String,
    /// `STUDENT ID CARD` / `TEACHER ID CARD`.
    pub badge: String,
    pub name: String,
    pub initial: String,
    pub photo_url: Option<String>,
    /// Short chips under the name (class and school, qualification and
    /// experience).
    pub headline: Vec<String>,
    pub sections: Vec<CardSection>,
    pub people: Vec<PersonTile>,
    /// Issue date, e.g. `14 October 2026`.
    pub issued_on: String,
    pub profile_path: String,
    pub qr_payload: String,
    pub qr_svg: String,
}

/// Incrementally assembles an [`IdCard`].
pub struct IdCardBuilder {
    kind: EntityKind,
    id: EntityId,
    name: String,
    photo_url: Option<String>,
    created_at: Timestamp,
    headline: Vec<String>,
    sections: Vec<CardSection>,
    people: Vec<PersonTile>,
}

impl IdCard {
    pub fn builder(
        kind: EntityKind,
        id: EntityId,
        name: &str,
        photo_url: Option<&str>,
        created_at: Timestamp,
    ) -> IdCardBuilder {
        IdCardBuilder {
            kind,
            id,
            name: name.to_string(),
            photo_url: photo_url.map(str::to_string),
            created_at,
            headline: Vec::new(),
            sections: Vec::new(),
            people: Vec::new(),
        }
    }
}

impl IdCardBuilder {
    /// Add a headline chip, skipped when blank.
    pub fn headline(mut self, value: &str) -> Self {
        if !value.trim().is_empty() {
            self.headline.push(value.to_string());
        }
        self
    }

    /// Add a section; blank rows are dropped and an empty section is omitted.
    pub fn section(mut self, title: &'static str, rows: &[(&'static str, &str)]) -> Self {
        let rows: Vec<CardRow> = rows
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|&(label, value)| CardRow {
                label,
                value: value.to_string(),
            })
            .collect();
        if !rows.is_empty() {
            self.sections.push(CardSection { title, rows });
        }
        self
    }

    pub fn person(mut self, role: &'static str, name: &str, photo_url: Option<&str>) -> Self {
        self.people.push(PersonTile {
            role,
            name: name.to_string(),
            photo_url: photo_url.map(str::to_string),
            initial: initial_of(name),
        });
        self
    }

    /// Render the QR code for `origin` and produce the finished card.
    pub fn finish(self, origin: &ServingOrigin) -> Result<IdCard, CoreError> {
        let rendered = qr::render(self.kind, self.id, origin)?;
        Ok(IdCard {
            kind: self.kind,
            id: self.id,
            display_id: self.id.to_string().to_uppercase(),
            badge: format!("{} ID CARD", self.kind.label().to_uppercase()),
            initial: initial_of(&self.name),
            name: self.name,
            photo_url: self.photo_url,
            headline: self.headline,
            sections: self.sections,
            people: self.people,
            issued_on: format_issue_date(self.created_at),
            profile_path: profile_path(self.kind, self.id),
            qr_payload: rendered.payload,
            qr_svg: rendered.svg,
        })
    }
}

/// First character of a name, upper-cased; empty for a blank name.
fn initial_of(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}

/// Long-form issue date, e.g. `14 October 2026`.
pub fn format_issue_date(ts: Timestamp) -> String {
    ts.format("%-d %B %Y").to_string()
}
