//! Caller's restaurant profile and its locations

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Location, Restaurant};

use crate::auth::TenantContext;
use crate::db::Database;
use crate::error::ServiceResult;

/// Location with its opening state evaluated in the business time zone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    #[serde(flatten)]
    pub location: Location,
    pub open_now: bool,
    pub today_hours: String,
}

impl LocationView {
    pub fn at(location: Location, now: DateTime<Utc>, tz: Tz) -> Self {
        let local = now.with_timezone(&tz);
        let hours = &location.business_hours;
        Self {
            open_now: hours.is_open_at(local.naive_local()),
            today_hours: hours.day(local.weekday()).format(),
            location,
        }
    }
}

#[derive(Clone)]
pub struct RestaurantService {
    db: Database,
    tz: Tz,
}

impl RestaurantService {
    pub fn new(db: Database, tz: Tz) -> Self {
        Self { db, tz }
    }

    pub async fn current(&self, ctx: &TenantContext) -> ServiceResult<Restaurant> {
        let restaurant = self
            .db
            .restaurants
            .find(ctx.restaurant_id())
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound))?;
        Ok(restaurant)
    }

    pub async fn locations(&self, ctx: &TenantContext) -> ServiceResult<Vec<LocationView>> {
        let now = shared::util::now();
        let locations = self.db.restaurants.locations(ctx.restaurant_id()).await?;
        Ok(locations
            .into_iter()
            .map(|l| LocationView::at(l, now, self.tz))
            .collect())
    }
}
