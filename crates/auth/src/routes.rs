//! Declarative route table: URL path → (who may see it, what to render).

use serde::Serialize;

use crate::Role;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const SELLER_DASHBOARD_PATH: &str = "/seller/dashboard";
pub const CUSTOMER_DASHBOARD_PATH: &str = "/customer/dashboard";

/// Views of the storefront application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Register,
    NotFound,
    AdminDashboard,
    AdminSellers,
    AdminProducts,
    AdminOrders,
    SellerDashboard,
    SellerProducts,
    SellerOrders,
    CustomerDashboard,
    CustomerProducts,
    CustomerCart,
    CustomerOrders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Access {
    Public,
    Protected(Vec<Role>),
}

#[derive(Debug, Clone)]
struct RouteEntry<V> {
    path: String,
    access: Access,
    view: V,
}

/// Outcome of resolving a path against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a, V> {
    pub view: &'a V,
    /// `None` for public routes; otherwise the roles the gate must admit.
    pub allowed: Option<&'a [Role]>,
}

/// Route table, evaluated per navigation.
#[derive(Debug, Clone)]
pub struct RouteTable<V> {
    entries: Vec<RouteEntry<V>>,
    fallback: V,
}

impl<V> RouteTable<V> {
    /// Empty table; unmatched paths render `fallback` publicly.
    pub fn new(fallback: V) -> Self {
        Self {
            entries: Vec::new(),
            fallback,
        }
    }

    pub fn public(mut self, path: &str, view: V) -> Self {
        self.entries.push(RouteEntry {
            path: normalize(path).to_string(),
            access: Access::Public,
            view,
        });
        self
    }

    /// Register a group of routes sharing one allowed-role set.
    pub fn protected<I>(mut self, allowed: &[Role], routes: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
    {
        for (path, view) in routes {
            self.entries.push(RouteEntry {
                path: normalize(path).to_string(),
                access: Access::Protected(allowed.to_vec()),
                view,
            });
        }
        self
    }

    pub fn resolve(&self, path: &str) -> RouteMatch<'_, V> {
        let path = normalize(path);
        match self.entries.iter().find(|e| e.path == path) {
            Some(entry) => RouteMatch {
                view: &entry.view,
                allowed: match &entry.access {
                    Access::Public => None,
                    Access::Protected(roles) => Some(roles.as_slice()),
                },
            },
            None => RouteMatch {
                view: &self.fallback,
                allowed: None,
            },
        }
    }
}

impl RouteTable<View> {
    /// The storefront's route table.
    pub fn storefront() -> Self {
        RouteTable::new(View::NotFound)
            .public("/", View::Login)
            .public(LOGIN_PATH, View::Login)
            .public(REGISTER_PATH, View::Register)
            .protected(
                &[Role::Admin],
                [
                    (ADMIN_DASHBOARD_PATH, View::AdminDashboard),
                    ("/admin/sellers", View::AdminSellers),
                    ("/admin/products", View::AdminProducts),
                    ("/admin/orders", View::AdminOrders),
                ],
            )
            .protected(
                &[Role::Seller],
                [
                    (SELLER_DASHBOARD_PATH, View::SellerDashboard),
                    ("/seller/products", View::SellerProducts),
                    ("/seller/orders", View::SellerOrders),
                ],
            )
            .protected(
                &[Role::Customer],
                [
                    (CUSTOMER_DASHBOARD_PATH, View::CustomerDashboard),
                    ("/customer/products", View::CustomerProducts),
                    ("/customer/cart", View::CustomerCart),
                    ("/customer/orders", View::CustomerOrders),
                ],
            )
    }
}

/// Strip query, fragment and a trailing slash (the root stays `/`).
fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_query_fragment_and_slash() {
        assert_eq!(normalize("/seller/products/?page=2"), "/seller/products");
        assert_eq!(normalize("/customer/cart#top"), "/customer/cart");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/?next=/admin"), "/");
    }

    #[test]
    fn public_routes_have_no_role_set() {
        let table = RouteTable::storefront();
        for path in ["/", "/login", "/register"] {
            assert!(table.resolve(path).allowed.is_none(), "{path}");
        }
        assert_eq!(*table.resolve("/").view, View::Login);
    }

    #[test]
    fn protected_routes_carry_their_roles() {
        let table = RouteTable::storefront();

        let m = table.resolve("/admin/sellers");
        assert_eq!(*m.view, View::AdminSellers);
        assert_eq!(m.allowed, Some(&[Role::Admin][..]));

        let m = table.resolve("/customer/cart/");
        assert_eq!(*m.view, View::CustomerCart);
        assert_eq!(m.allowed, Some(&[Role::Customer][..]));
    }

    #[test]
    fn unknown_path_falls_back_publicly() {
        let table = RouteTable::storefront();
        let m = table.resolve("/admin/secret");
        assert_eq!(*m.view, View::NotFound);
        assert!(m.allowed.is_none());
    }

    #[test]
    fn every_dashboard_is_routed_to_its_own_role() {
        let table = RouteTable::storefront();
        for role in Role::ALL {
            assert_eq!(table.resolve(role.dashboard_path()).allowed, Some(&[role][..]));
        }
    }
}
