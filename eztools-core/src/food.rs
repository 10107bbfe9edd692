//! "Hôm nay ăn gì?" – a persisted list of dishes to pick lunch from.

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::db::{KeyValueStore, StoreError, load_json, save_json};
use crate::random::RandomProvider;

const DEFAULT_FOODS: [&str; 8] = [
    "Bún chả",
    "Phở bò",
    "Cơm tấm",
    "Bánh mì",
    "Pizza",
    "Gà rán",
    "Sushi",
    "Bún đậu mắm tôm",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodList {
    items: Vec<String>,
}

impl Default for FoodList {
    fn default() -> Self {
        Self {
            items: DEFAULT_FOODS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl FoodList {
    pub const STORE_KEY: &'static str = "foodList";

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Appends a trimmed dish name. Blank input is ignored and returns `false`.
    pub fn add(
        &mut self,
        name: &str,
    ) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.items.push(name.to_string());
        true
    }

    /// Removes and returns the dish at `index`, if any.
    pub fn remove(
        &mut self,
        index: usize,
    ) -> Option<String> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Uniformly picks one dish; `None` when the list is empty.
    pub fn pick<R: RngCore>(
        &self,
        provider: &mut RandomProvider<R>,
    ) -> Option<&str> {
        provider
            .uniform_index(self.items.len())
            .map(|index| self.items[index].as_str())
    }

    /// Loads the stored list, falling back to the default dishes.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Self, StoreError> {
        Ok(load_json(store, Self::STORE_KEY).await?.unwrap_or_default())
    }

    pub async fn save(
        &self,
        store: &dyn KeyValueStore,
    ) -> Result<(), StoreError> {
        save_json(store, Self::STORE_KEY, self).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::db::MemoryStore;

    #[test]
    fn default_list_has_eight_dishes() {
        let foods = FoodList::default();

        assert_eq!(foods.items().len(), 8);
        assert_eq!(foods.items()[1], "Phở bò");
    }

    #[test]
    fn add_trims_and_ignores_blank_names() {
        let mut foods = FoodList::default();

        assert!(foods.add("  Bún bò Huế "));
        assert!(!foods.add("   "));

        assert_eq!(foods.items().len(), 9);
        assert_eq!(foods.items()[8], "Bún bò Huế");
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let mut foods = FoodList::default();

        assert_eq!(foods.remove(0).as_deref(), Some("Bún chả"));
        assert_eq!(foods.remove(42), None);
        assert_eq!(foods.items().len(), 7);
    }

    #[test]
    fn pick_from_empty_list_is_none() {
        let mut foods = FoodList::default();
        while foods.remove(0).is_some() {}

        assert!(foods.is_empty());
        assert_eq!(foods.pick(&mut RandomProvider::new()), None);
    }

    #[test]
    fn pick_uses_uniform_index() {
        let foods = FoodList::default();
        let mut provider = RandomProvider::with_source(StepRng::new(10, 0));

        assert_eq!(foods.pick(&mut provider), Some("Cơm tấm"));
    }

    #[tokio::test]
    async fn load_without_stored_list_uses_defaults() {
        let store = MemoryStore::new();

        assert_eq!(FoodList::load(&store).await.unwrap(), FoodList::default());
    }

    #[tokio::test]
    async fn saved_list_is_reloaded() {
        let store = MemoryStore::new();
        let mut foods = FoodList::default();
        foods.remove(4);
        foods.add("Lẩu thái");

        foods.save(&store).await.unwrap();

        let reloaded = FoodList::load(&store).await.unwrap();
        assert_eq!(reloaded, foods);
        assert_eq!(
            store.get(FoodList::STORE_KEY).await.unwrap().unwrap(),
            serde_json::to_string(foods.items()).unwrap()
        );
    }
}
