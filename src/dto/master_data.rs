//! Page data for the master-data screens.

use crate::domain::company::Company;
use crate::domain::location::{Location, visible_locations};
use crate::domain::machine::Machine;
use crate::domain::product::Product;
use crate::domain::user::{Role, User};

/// Data required to render the companies page.
#[derive(Debug)]
pub struct CompaniesPageData {
    pub companies: Vec<Company>,
}

/// Data required to render the locations page.
///
/// The full list is kept so the "show inactive" toggle can be applied
/// again without another backend request.
#[derive(Debug)]
pub struct LocationsPageData {
    pub all: Vec<Location>,
    pub companies: Vec<Company>,
    pub show_inactive: bool,
}

impl LocationsPageData {
    pub fn visible(&self) -> Vec<Location> {
        visible_locations(&self.all, self.show_inactive)
    }

    pub fn toggle_inactive(&mut self, show_inactive: bool) -> Vec<Location> {
        self.show_inactive = show_inactive;
        self.visible()
    }
}

#[derive(Debug)]
pub struct MachinesPageData {
    pub machines: Vec<Machine>,
    pub locations: Vec<Location>,
}

#[derive(Debug)]
pub struct ProductsPageData {
    pub products: Vec<Product>,
}

/// Query parameters of the users page.
#[derive(Debug, Default, serde::Deserialize)]
pub struct UsersQuery {
    pub search: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug)]
pub struct UsersPageData {
    pub users: Vec<User>,
    pub machines: Vec<Machine>,
    pub search: Option<String>,
    pub role: Option<Role>,
}
