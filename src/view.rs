use std::collections::BTreeMap;

/// Template data collected for the current request.
///
/// `CsrfGuard` merges `csrf_key` and `csrf_token` into the instance found in
/// the request extensions, inserting one first if needed. Handlers pass it on
/// to whatever renders their templates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewData(BTreeMap<String, String>);

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds every pair, replacing values of keys already present and keeping
    /// all other keys.
    pub fn merge<K, V>(&mut self, data: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0
            .extend(data.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ViewData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        data.merge(iter);
        data
    }
}
