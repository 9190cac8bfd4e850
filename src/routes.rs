use std::collections::{BTreeMap, HashMap};

use crate::Error;

/// Maps route names to the concrete paths they are served on.
pub trait RouteResolver {
    fn url_for(&self, route: &str) -> Option<String>;
}

impl RouteResolver for HashMap<String, String> {
    fn url_for(&self, route: &str) -> Option<String> {
        self.get(route).cloned()
    }
}

impl RouteResolver for BTreeMap<String, String> {
    fn url_for(&self, route: &str) -> Option<String> {
        self.get(route).cloned()
    }
}

/// Resolver backed by a closure, see [`resolver_fn`].
#[derive(Clone, Copy, Debug)]
pub struct ResolverFn<F> {
    f: F,
}

/// Wraps a closure so it can be used as a [`RouteResolver`].
pub fn resolver_fn<F>(f: F) -> ResolverFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    ResolverFn { f }
}

impl<F> RouteResolver for ResolverFn<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn url_for(&self, route: &str) -> Option<String> {
        (self.f)(route)
    }
}

/// One route name or a list of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Routes {
    One(String),
    Many(Vec<String>),
}

impl Routes {
    /// Resolves every route name, failing before anything is returned if one
    /// of them is empty or unknown.
    pub(crate) fn resolve(self, resolver: &impl RouteResolver) -> Result<Vec<String>, Error> {
        let names = match self {
            Routes::One(name) => vec![name],
            Routes::Many(names) => names,
        };

        if names.is_empty() || names.iter().any(String::is_empty) {
            return Err(Error::InvalidRoutes);
        }

        names
            .into_iter()
            .map(|name| resolver.url_for(&name).ok_or(Error::UnknownRoute(name)))
            .collect()
    }
}

impl From<&str> for Routes {
    fn from(name: &str) -> Self {
        Routes::One(name.to_owned())
    }
}

impl From<String> for Routes {
    fn from(name: String) -> Self {
        Routes::One(name)
    }
}

impl From<Vec<String>> for Routes {
    fn from(names: Vec<String>) -> Self {
        Routes::Many(names)
    }
}

impl From<Vec<&str>> for Routes {
    fn from(names: Vec<&str>) -> Self {
        Routes::Many(names.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for Routes {
    fn from(names: &[&str]) -> Self {
        Routes::Many(names.iter().map(|name| (*name).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Routes {
    fn from(names: [&str; N]) -> Self {
        Routes::Many(names.iter().map(|name| (*name).to_owned()).collect())
    }
}
