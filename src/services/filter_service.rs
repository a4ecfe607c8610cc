//! Filtros para listados
//!
//! Funciones puras sobre colecciones en memoria: búsqueda de texto
//! (substring, sin distinguir mayúsculas) combinada con un filtro de estado.
//! Conservan el orden relativo y nunca modifican la entrada.

use std::str::FromStr;

use crate::models::{Driver, DriverStatus, Entity, Route, RouteStatus, Vehicle, VehicleStatus};

/// Valor centinela que desactiva el filtro de estado
pub const ALL_SENTINEL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        StatusFilter::All
    }
}

impl<S: PartialEq> StatusFilter<S> {
    pub fn matches(&self, status: &S) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(expected) => expected == status,
        }
    }
}

impl<S: FromStr> FromStr for StatusFilter<S> {
    type Err = S::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == ALL_SENTINEL {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Entidades que se pueden buscar y filtrar por estado
pub trait Searchable {
    type Status: PartialEq;

    fn status(&self) -> &Self::Status;

    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Route {
    type Status = RouteStatus;

    fn status(&self) -> &RouteStatus {
        &self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.start_location.as_str(), self.end_location.as_str()]
    }
}

impl Searchable for Vehicle {
    type Status = VehicleStatus;

    fn status(&self) -> &VehicleStatus {
        &self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.plate.as_str(), self.brand.as_str(), self.model.as_str()]
    }
}

impl Searchable for Driver {
    type Status = DriverStatus;

    fn status(&self) -> &DriverStatus {
        &self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.license_number.as_str()]
    }
}

/// Texto vacío coincide con todo
pub fn matches_text<T: Searchable>(item: &T, text: &str) -> bool {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn filter_entities<'a, T: Searchable>(
    items: &'a [T],
    text: &str,
    status: &StatusFilter<T::Status>,
) -> Vec<&'a T> {
    items
        .iter()
        .filter(|item| status.matches(item.status()) && matches_text(*item, text))
        .collect()
}

/// Descartar registros desactivados (soft-delete)
pub fn only_active<E: Entity>(items: Vec<E>) -> Vec<E> {
    items.into_iter().filter(|item| item.is_active()).collect()
}
