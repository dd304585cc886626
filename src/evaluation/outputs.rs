//! 挿入順を保持する名前付き配列のマップ

use ndarray::{Array, ArrayD, Dimension};

/// 名前付きの真の値または予測値の配列（挿入順に走査）
#[derive(Debug, Clone, Default)]
pub struct NamedArrays {
    entries: Vec<(String, ArrayD<f64>)>,
}

impl NamedArrays {
    pub fn new() -> Self {
        Self::default()
    }

    /// 配列を追加（既存の名前を置き換える場合は位置を保持）
    pub fn insert<D: Dimension>(&mut self, name: impl Into<String>, array: Array<f64, D>) {
        let name = name.into();
        let array = array.into_dyn();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = array,
            None => self.entries.push((name, array)),
        }
    }

    /// ビルダー形式の [`insert`](Self::insert)
    pub fn with<D: Dimension>(mut self, name: impl Into<String>, array: Array<f64, D>) -> Self {
        self.insert(name, array);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ArrayD<f64>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, array)| array)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(key, _)| key.as_str()).collect()
    }

    pub fn entries(&self) -> &[(String, ArrayD<f64>)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArrayD<f64>)> + '_ {
        self.entries.iter().map(|(key, array)| (key.as_str(), array))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, ArrayD<f64>)> for NamedArrays {
    fn from_iter<I: IntoIterator<Item = (S, ArrayD<f64>)>>(iter: I) -> Self {
        let mut arrays = NamedArrays::new();
        for (name, array) in iter {
            arrays.insert(name, array);
        }
        arrays
    }
}
