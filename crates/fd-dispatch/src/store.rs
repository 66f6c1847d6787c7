//! Persistence seam for drivers, restaurants, and assignments.
//!
//! Distributors never talk to a store directly.  [`run_distribution`] hands
//! the distributor a snapshot and commits the resulting [`Assignment`] in one
//! all-or-nothing call.  The store holds its write lock (or transaction) from
//! the snapshot read to the commit, so two runs never distribute the same
//! snapshot and no other write lands in between.

use std::collections::HashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use log::info;

use fd_core::{Driver, Restaurant, RestaurantId};

use crate::distributor::{Assignment, Distributor};
use crate::{DispatchError, DispatchResult};

/// Where drivers and restaurants live between runs.
pub trait FleetStore: Send + Sync {
    /// All drivers, ordered by ID.
    fn drivers(&self) -> DispatchResult<Vec<Driver>>;

    /// All restaurants, ordered by ID.
    fn restaurants(&self) -> DispatchResult<Vec<Restaurant>>;

    /// Set `restaurant` for every driver in `assignment`.
    ///
    /// Either every entry is applied or none is: an unknown driver or
    /// restaurant ID fails the whole batch.  Returns the number of drivers
    /// updated.
    fn apply_assignment(&self, assignment: &Assignment) -> DispatchResult<usize>;

    /// Pass one consistent snapshot of drivers and restaurants to
    /// `distribute`, then commit the assignment it returns with the same
    /// all-or-nothing rules as [`apply_assignment`](Self::apply_assignment).
    /// Other writers are held off until the commit has landed.
    fn distribute_and_commit(
        &self,
        distribute: &mut dyn FnMut(&[Driver], &[Restaurant]) -> Assignment,
    ) -> DispatchResult<Assignment>;

    /// Replace the whole driver set.
    fn place_drivers(&self, drivers: Vec<Driver>) -> DispatchResult<()>;

    /// Overwrite `orders_count` for the listed restaurants.  Unknown IDs fail
    /// the whole batch.
    fn set_orders(&self, orders: &[(RestaurantId, u32)]) -> DispatchResult<()>;
}

/// Run `distributor` against the current contents of `store` and commit the
/// result.
pub fn run_distribution<S, D>(store: &S, distributor: &D) -> DispatchResult<Assignment>
where
    S: FleetStore + ?Sized,
    D: Distributor + ?Sized,
{
    let mut sizes = (0, 0);
    let mut elapsed = Duration::ZERO;

    let assignment = store.distribute_and_commit(&mut |drivers, restaurants| {
        sizes = (drivers.len(), restaurants.len());
        let started = Instant::now();
        let assignment = distributor.distribute(drivers, restaurants);
        elapsed = started.elapsed();
        assignment
    })?;

    info!(
        "Distributed with {}: {}/{} drivers over {} restaurants in {:.2} ms",
        distributor.name(),
        assignment.len(),
        sizes.0,
        sizes.1,
        elapsed.as_secs_f64() * 1_000.0
    );
    Ok(assignment)
}

// ── MemoryFleetStore ──────────────────────────────────────────────────────────

#[derive(Default)]
struct FleetState {
    drivers:     Vec<Driver>,
    restaurants: Vec<Restaurant>,
}

impl FleetState {
    /// Validate the whole batch, then apply it.
    fn assign(&mut self, assignment: &Assignment) -> DispatchResult<usize> {
        let known: HashSet<RestaurantId> = self.restaurants.iter().map(|r| r.id).collect();
        let mut slots = Vec::with_capacity(assignment.len());
        for (&driver, &restaurant) in assignment {
            let slot = self
                .drivers
                .binary_search_by_key(&driver, |d| d.id)
                .map_err(|_| DispatchError::UnknownDriver(driver))?;
            if !known.contains(&restaurant) {
                return Err(DispatchError::UnknownRestaurant(restaurant));
            }
            slots.push((slot, restaurant));
        }

        for &(slot, restaurant) in &slots {
            self.drivers[slot].restaurant = Some(restaurant);
        }
        Ok(slots.len())
    }
}

/// In-process [`FleetStore`].  Writes validate the whole batch before
/// touching any row.
#[derive(Default)]
pub struct MemoryFleetStore {
    state: RwLock<FleetState>,
}

impl MemoryFleetStore {
    pub fn new(restaurants: Vec<Restaurant>) -> Self {
        Self::with_drivers(restaurants, Vec::new())
    }

    pub fn with_drivers(mut restaurants: Vec<Restaurant>, mut drivers: Vec<Driver>) -> Self {
        restaurants.sort_by_key(|r| r.id);
        drivers.sort_by_key(|d| d.id);
        Self { state: RwLock::new(FleetState { drivers, restaurants }) }
    }

    fn read(&self) -> DispatchResult<RwLockReadGuard<'_, FleetState>> {
        self.state
            .read()
            .map_err(|_| DispatchError::Store("fleet state lock poisoned".into()))
    }

    fn write(&self) -> DispatchResult<RwLockWriteGuard<'_, FleetState>> {
        self.state
            .write()
            .map_err(|_| DispatchError::Store("fleet state lock poisoned".into()))
    }
}

impl FleetStore for MemoryFleetStore {
    fn drivers(&self) -> DispatchResult<Vec<Driver>> {
        Ok(self.read()?.drivers.clone())
    }

    fn restaurants(&self) -> DispatchResult<Vec<Restaurant>> {
        Ok(self.read()?.restaurants.clone())
    }

    fn apply_assignment(&self, assignment: &Assignment) -> DispatchResult<usize> {
        self.write()?.assign(assignment)
    }

    fn distribute_and_commit(
        &self,
        distribute: &mut dyn FnMut(&[Driver], &[Restaurant]) -> Assignment,
    ) -> DispatchResult<Assignment> {
        let mut state = self.write()?;
        let assignment = distribute(state.drivers.as_slice(), state.restaurants.as_slice());
        state.assign(&assignment)?;
        Ok(assignment)
    }

    fn place_drivers(&self, mut drivers: Vec<Driver>) -> DispatchResult<()> {
        drivers.sort_by_key(|d| d.id);
        self.write()?.drivers = drivers;
        Ok(())
    }

    fn set_orders(&self, orders: &[(RestaurantId, u32)]) -> DispatchResult<()> {
        let mut state = self.write()?;

        let mut slots = Vec::with_capacity(orders.len());
        for &(id, count) in orders {
            let slot = state
                .restaurants
                .binary_search_by_key(&id, |r| r.id)
                .map_err(|_| DispatchError::UnknownRestaurant(id))?;
            slots.push((slot, count));
        }

        for (slot, count) in slots {
            state.restaurants[slot].orders_count = count;
        }
        Ok(())
    }
}
