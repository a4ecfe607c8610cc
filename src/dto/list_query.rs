use std::str::FromStr;

use serde::Deserialize;

use crate::models::Entity;
use crate::services::filter_service::{filter_entities, only_active, Searchable, StatusFilter};
use crate::utils::errors::{AppError, AppResult};

// Query string común de los listados: ?search=&status=&includeInactive=
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

impl ListQuery {
    /// `All` o ausente desactiva el filtro; un estado desconocido es `BadRequest`
    pub fn status_filter<S>(&self) -> AppResult<StatusFilter<S>>
    where
        S: FromStr<Err = String>,
    {
        self.status
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(AppError::BadRequest)
    }

    pub fn search_text(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    /// Filtrar un listado completo conservando el orden de creación
    pub fn apply<E>(&self, items: Vec<E>, status: &StatusFilter<E::Status>) -> Vec<E>
    where
        E: Entity + Searchable,
    {
        let items = if self.include_inactive {
            items
        } else {
            only_active(items)
        };

        filter_entities(&items, self.search_text(), status)
            .into_iter()
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{audit, Driver, DriverStatus, RouteStatus};

    fn query(search: &str, status: &str) -> ListQuery {
        ListQuery {
            search: Some(search.to_string()),
            status: Some(status.to_string()),
            include_inactive: false,
        }
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!(
            ListQuery::default().status_filter::<RouteStatus>().unwrap(),
            StatusFilter::All
        );
        assert_eq!(
            query("", "All").status_filter::<RouteStatus>().unwrap(),
            StatusFilter::All
        );
        assert_eq!(
            query("", "InProgress").status_filter::<RouteStatus>().unwrap(),
            StatusFilter::Only(RouteStatus::InProgress)
        );
        assert!(matches!(
            query("", "Paused").status_filter::<RouteStatus>(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_apply_hides_inactive_unless_requested() {
        let ana = Driver::new("Ana".into(), "12345678901".into(), DriverStatus::Available);
        let bia = audit::set_active(
            Driver::new("Bia".into(), "10987654321".into(), DriverStatus::Available),
            false,
        );
        let drivers = vec![ana, bia];

        let visible = ListQuery::default().apply(drivers.clone(), &StatusFilter::All);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Ana");

        let all = ListQuery {
            include_inactive: true,
            ..Default::default()
        }
        .apply(drivers, &StatusFilter::All);
        assert_eq!(all.len(), 2);
    }
}
