//! [`Command`] for checking out a returned vehicle of a [`Rental`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        rental,
        trip::{self, PhotoSlot, Violation},
        Rental,
    },
    infra::{gateway, Gateway},
    inflight::{self, AlreadyInFlight},
    Service,
};

use super::Command;

/// [`Command`] for checking out a returned vehicle of an active [`Rental`].
///
/// The rental service computes the actual cost and penalties of the
/// [`Rental`] out of the submitted [`trip::Readings`] and moves it into
/// [`rental::Status::Completed`].
#[derive(Clone, Debug)]
pub struct CheckOutRental {
    /// ID of the [`Rental`] to check out.
    pub rental_id: rental::Id,

    /// [`trip::Readings`] taken at return.
    pub readings: trip::Readings,

    /// Notes about damage found at return.
    pub damage_notes: Option<String>,

    /// Photos taken at return.
    pub photos: trip::PhotoChecklist,
}

impl<Gw, Sc> Command<CheckOutRental> for Service<Gw, Sc>
where
    Gw: Gateway<
            Select<By<Option<Rental>, rental::Id>>,
            Ok = Option<Rental>,
            Err = Traced<gateway::Error>,
        > + Gateway<
            Insert<rental::Checkout>,
            Ok = (),
            Err = Traced<gateway::Error>,
        >,
{
    /// [`trip::Summary`] of the trip, if the handover [`trip::Readings`]
    /// are known.
    type Ok = Option<trip::Summary>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CheckOutRental,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CheckOutRental {
            rental_id,
            readings,
            damage_notes,
            photos,
        } = cmd;

        let _guard = self
            .in_flight()
            .acquire(&rental_id, inflight::Stage::Return)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let rental = self
            .gateway()
            .execute(Select(By::<Option<Rental>, _>::new(rental_id.clone())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::RentalNotExists(rental_id.clone()))
            .map_err(tracerr::wrap!())?;

        if rental.status != rental::Status::Active {
            return Err(tracerr::new!(E::OrderNotActive(
                rental.id,
                rental.status,
            )));
        }

        let start = rental.start_readings();
        self.config()
            .return_validation
            .check(start, readings, &photos)
            .map_err(|v| match v {
                Violation::PhotosMissing(slots) => E::PhotosMissing(slots),
                v @ (Violation::BatteryOutOfRange(_)
                | Violation::MileageDecreased { .. }) => {
                    E::InvalidReadings(v)
                }
            })
            .map_err(tracerr::wrap!())?;

        let summary = start.map(|s| {
            trip::Summary::new(s, readings, rental.start_time, DateTime::now())
        });
        if summary.is_some_and(|s| s.distance.is_sign_negative()) {
            log::warn!(
                "`Rental(id: {rental_id})` returned with lower mileage than \
                 at handover",
            );
        }

        self.gateway()
            .execute(Insert(rental::Checkout {
                rental_id,
                readings,
                damage_notes,
                photos,
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(summary)
    }
}

/// Error of [`CheckOutRental`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Rental`] is being checked out already.
    #[display("{_0}")]
    #[from]
    AlreadyInFlight(AlreadyInFlight),

    /// [`Gateway`] error.
    #[display("`Gateway` operation failed: {_0}")]
    #[from]
    Gateway(gateway::Error),

    /// Return [`trip::Readings`] are rejected.
    #[display("Invalid return readings: {_0}")]
    InvalidReadings(#[error(not(source))] Violation),

    /// [`Rental`] is not active.
    #[display("`Rental(id: {_0})` is `{_1}`, not active")]
    OrderNotActive(
        #[error(not(source))] rental::Id,
        #[error(not(source))] rental::Status,
    ),

    /// Some return photos are missing.
    #[display("Return photos are missing: {_0:?}")]
    PhotosMissing(#[error(not(source))] Vec<PhotoSlot>),

    /// [`Rental`] with the provided ID does not exist.
    #[display("`Rental(id: {_0})` does not exist")]
    RentalNotExists(#[error(not(source))] rental::Id),
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::{
        domain::{
            rental,
            trip::{BatteryLevel, Mileage, PhotoChecklist, PhotoSlot, Readings},
        },
        infra::gateway::Fake,
        testing::{rental, service},
        Command as _,
    };

    use super::{CheckOutRental, ExecutionError};

    fn readings(battery: i16, mileage: i64) -> Readings {
        Readings {
            battery: BatteryLevel::from(battery),
            mileage: Mileage::from(Decimal::from(mileage)),
        }
    }

    fn all_photos() -> PhotoChecklist {
        let mut photos = PhotoChecklist::default();
        for slot in [
            PhotoSlot::Front,
            PhotoSlot::Rear,
            PhotoSlot::Left,
            PhotoSlot::Right,
            PhotoSlot::Interior,
        ] {
            photos.capture(slot, format!("photo://{slot}"));
        }
        photos
    }

    #[tokio::test]
    async fn submits_checkout_and_summarizes_trip() {
        let mut order = rental("17", 350_000, rental::Status::Active);
        order.start_battery = Some(BatteryLevel::from(90));
        order.start_mileage = Some(Mileage::from(Decimal::from(1_200)));
        let svc = service(Fake::with_rental(order.clone()));

        let summary = svc
            .execute(CheckOutRental {
                rental_id: order.id.clone(),
                readings: readings(55, 1_284),
                damage_notes: Some("scratch on the left mirror".into()),
                photos: all_photos(),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.distance, Decimal::from(84));
        assert_eq!(summary.battery_used, 35);
        assert_eq!(svc.gateway().state().checkouts.len(), 1);
        assert_eq!(
            svc.gateway().status_of(&order.id),
            Some(rental::Status::Completed),
        );
    }

    #[tokio::test]
    async fn skips_summary_without_handover_readings() {
        let order = rental("17", 350_000, rental::Status::Active);
        let svc = service(Fake::with_rental(order.clone()));

        let summary = svc
            .execute(CheckOutRental {
                rental_id: order.id,
                readings: readings(55, 1_284),
                damage_notes: None,
                photos: all_photos(),
            })
            .await
            .unwrap();

        assert_eq!(summary, None);
        assert_eq!(svc.gateway().state().checkouts.len(), 1);
    }

    #[tokio::test]
    async fn requires_all_photos() {
        let order = rental("17", 350_000, rental::Status::Active);
        let svc = service(Fake::with_rental(order.clone()));
        let mut photos = PhotoChecklist::default();
        photos.capture(PhotoSlot::Front, "photo://front");

        let err = svc
            .execute(CheckOutRental {
                rental_id: order.id,
                readings: readings(55, 1_284),
                damage_notes: None,
                photos,
            })
            .await
            .unwrap_err();

        let ExecutionError::PhotosMissing(missing) = err.as_ref() else {
            panic!("expected missing photos");
        };
        assert_eq!(missing.len(), 4);
        assert!(!missing.contains(&PhotoSlot::Front));
        assert!(svc.gateway().state().checkouts.is_empty());
    }

    #[tokio::test]
    async fn rejects_inactive_order() {
        let order = rental("17", 350_000, rental::Status::Confirmed);
        let svc = service(Fake::with_rental(order.clone()));

        let err = svc
            .execute(CheckOutRental {
                rental_id: order.id,
                readings: readings(55, 1_284),
                damage_notes: None,
                photos: all_photos(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::OrderNotActive(_, rental::Status::Confirmed),
        ));
    }
}
