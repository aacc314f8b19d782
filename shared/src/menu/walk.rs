//! Tree walker
//!
//! Depth-first, order-preserving traversal of every [`MenuItem`] in a
//! [`MenuTree`], whatever levels are present. Per category the order is:
//! the category's own items, then for each subcategory its own items
//! followed by the items of each of its types.
//!
//! Walks are lazy iterators; calling the method again restarts the walk.
//! Options are not part of the item walk; [`MenuTree::options`] walks them
//! explicitly.

use std::fmt;

use crate::models::menu::{Category, ItemOption, MenuItem, MenuTree, Subcategory};

/// Location of an item as the chain of indices leading to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemPath {
    pub category: usize,
    pub subcategory: Option<usize>,
    pub menu_type: Option<usize>,
    pub item: usize,
}

impl ItemPath {
    /// Item directly under a category
    pub const fn category(category: usize, item: usize) -> Self {
        Self {
            category,
            subcategory: None,
            menu_type: None,
            item,
        }
    }

    /// Item directly under a subcategory
    pub const fn subcategory(category: usize, subcategory: usize, item: usize) -> Self {
        Self {
            category,
            subcategory: Some(subcategory),
            menu_type: None,
            item,
        }
    }

    /// Item under a type of a subcategory
    pub const fn typed(category: usize, subcategory: usize, menu_type: usize, item: usize) -> Self {
        Self {
            category,
            subcategory: Some(subcategory),
            menu_type: Some(menu_type),
            item,
        }
    }

    /// True for items directly under a category
    pub fn is_top_level(&self) -> bool {
        self.subcategory.is_none()
    }

    /// True when both items sit in the same item list
    pub fn same_container(&self, other: &ItemPath) -> bool {
        self.category == other.category
            && self.subcategory == other.subcategory
            && self.menu_type == other.menu_type
    }
}

impl fmt::Display for ItemPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.category)?;
        if let Some(s) = self.subcategory {
            write!(f, "/s{}", s)?;
        }
        if let Some(t) = self.menu_type {
            write!(f, "/t{}", t)?;
        }
        write!(f, "/i{}", self.item)
    }
}

/// Location of an option: its parent item plus the option index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionPath {
    pub item: ItemPath,
    pub option: usize,
}

impl fmt::Display for OptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/o{}", self.item, self.option)
    }
}

impl MenuTree {
    /// Walk every item with its path
    pub fn items(&self) -> impl Iterator<Item = (&MenuItem, ItemPath)> + '_ {
        self.categories.iter().enumerate().flat_map(|(ci, category)| {
            let direct = category
                .items
                .iter()
                .enumerate()
                .map(move |(ii, item)| (item, ItemPath::category(ci, ii)));

            let nested = category
                .subcategories
                .iter()
                .enumerate()
                .flat_map(move |(si, sub)| {
                    let own = sub
                        .items
                        .iter()
                        .enumerate()
                        .map(move |(ii, item)| (item, ItemPath::subcategory(ci, si, ii)));
                    let typed = sub.types.iter().enumerate().flat_map(move |(ti, ty)| {
                        ty.items
                            .iter()
                            .enumerate()
                            .map(move |(ii, item)| (item, ItemPath::typed(ci, si, ti, ii)))
                    });
                    own.chain(typed)
                });

            direct.chain(nested)
        })
    }

    /// Walk every item mutably, same order as [`MenuTree::items`]
    pub fn items_mut(&mut self) -> impl Iterator<Item = (&mut MenuItem, ItemPath)> + '_ {
        self.categories
            .iter_mut()
            .enumerate()
            .flat_map(|(ci, category)| {
                let Category {
                    items,
                    subcategories,
                    ..
                } = category;

                let direct = items
                    .iter_mut()
                    .enumerate()
                    .map(move |(ii, item)| (item, ItemPath::category(ci, ii)));

                let nested = subcategories
                    .iter_mut()
                    .enumerate()
                    .flat_map(move |(si, sub)| {
                        let Subcategory { items, types, .. } = sub;
                        let own = items
                            .iter_mut()
                            .enumerate()
                            .map(move |(ii, item)| (item, ItemPath::subcategory(ci, si, ii)));
                        let typed = types.iter_mut().enumerate().flat_map(move |(ti, ty)| {
                            ty.items
                                .iter_mut()
                                .enumerate()
                                .map(move |(ii, item)| (item, ItemPath::typed(ci, si, ti, ii)))
                        });
                        own.chain(typed)
                    });

                direct.chain(nested)
            })
    }

    /// Walk every option of every item
    pub fn options(&self) -> impl Iterator<Item = (&ItemOption, OptionPath)> + '_ {
        self.items().flat_map(|(item, path)| {
            item.options
                .iter()
                .enumerate()
                .map(move |(oi, option)| (option, OptionPath { item: path, option: oi }))
        })
    }

    /// Walk every option of every item mutably
    pub fn options_mut(&mut self) -> impl Iterator<Item = (&mut ItemOption, OptionPath)> + '_ {
        self.items_mut().flat_map(|(item, path)| {
            item.options
                .iter_mut()
                .enumerate()
                .map(move |(oi, option)| (option, OptionPath { item: path, option: oi }))
        })
    }

    /// Number of items at every depth
    pub fn item_count(&self) -> usize {
        self.items().count()
    }

    /// Resolve a path back to its item
    pub fn item_at(&self, path: ItemPath) -> Option<&MenuItem> {
        let category = self.categories.get(path.category)?;
        match (path.subcategory, path.menu_type) {
            (None, None) => category.items.get(path.item),
            (Some(si), None) => category.subcategories.get(si)?.items.get(path.item),
            (Some(si), Some(ti)) => category
                .subcategories
                .get(si)?
                .types
                .get(ti)?
                .items
                .get(path.item),
            (None, Some(_)) => None,
        }
    }

    pub fn item_at_mut(&mut self, path: ItemPath) -> Option<&mut MenuItem> {
        let category = self.categories.get_mut(path.category)?;
        match (path.subcategory, path.menu_type) {
            (None, None) => category.items.get_mut(path.item),
            (Some(si), None) => category.subcategories.get_mut(si)?.items.get_mut(path.item),
            (Some(si), Some(ti)) => category
                .subcategories
                .get_mut(si)?
                .types
                .get_mut(ti)?
                .items
                .get_mut(path.item),
            (None, Some(_)) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::menu::{MenuType, PricePair};

    fn item(name: &str) -> MenuItem {
        MenuItem {
            name: name.to_string(),
            price: Some(PricePair::new(None, "100")),
            ..Default::default()
        }
    }

    /// Every optional level present somewhere, absent somewhere else
    fn mixed_tree() -> MenuTree {
        let mut tree = MenuTree::new("es");
        tree.categories = vec![
            Category {
                name: "Entrantes".into(),
                items: vec![item("Sopa"), item("Ensalada")],
                ..Default::default()
            },
            Category {
                name: "Vacía".into(),
                ..Default::default()
            },
            Category {
                name: "Bebidas".into(),
                items: vec![item("Agua")],
                subcategories: vec![
                    Subcategory {
                        name: "Vinos".into(),
                        items: vec![item("Sangría")],
                        types: vec![
                            MenuType {
                                name: "Tintos".into(),
                                items: vec![item("Rioja"), item("Ribera")],
                            },
                            MenuType {
                                name: "Blancos".into(),
                                items: vec![item("Rueda")],
                            },
                        ],
                        ..Default::default()
                    },
                    Subcategory {
                        name: "Cervezas".into(),
                        types: vec![MenuType {
                            name: "Rubias".into(),
                            items: vec![item("Lager")],
                        }],
                        ..Default::default()
                    },
                ],
                ..Default::default()
            },
        ];
        tree
    }

    #[test]
    fn test_walk_visits_every_item_in_order() {
        let tree = mixed_tree();
        let names: Vec<&str> = tree.items().map(|(item, _)| item.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Sopa", "Ensalada", "Agua", "Sangría", "Rioja", "Ribera", "Rueda", "Lager"
            ]
        );
    }

    #[test]
    fn test_walk_paths() {
        let tree = mixed_tree();
        let paths: Vec<String> = tree.items().map(|(_, path)| path.to_string()).collect();
        assert_eq!(
            paths,
            vec![
                "c0/i0", "c0/i1", "c2/i0", "c2/s0/i0", "c2/s0/t0/i0", "c2/s0/t0/i1",
                "c2/s0/t1/i0", "c2/s1/t0/i0"
            ]
        );
    }

    #[test]
    fn test_walk_empty_tree_yields_nothing() {
        let tree = MenuTree::new("fr");
        assert_eq!(tree.items().count(), 0);
        assert_eq!(tree.options().count(), 0);
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = mixed_tree();
        let first: Vec<ItemPath> = tree.items().map(|(_, p)| p).collect();
        let second: Vec<ItemPath> = tree.items().map(|(_, p)| p).collect();
        assert_eq!(first, second);
        assert_eq!(tree.item_count(), 8);
    }

    #[test]
    fn test_walk_is_lazy() {
        let tree = mixed_tree();
        let first = tree.items().next().map(|(item, _)| item.name.clone());
        assert_eq!(first.as_deref(), Some("Sopa"));
    }

    #[test]
    fn test_paths_resolve_to_the_walked_item() {
        let tree = mixed_tree();
        for (item, path) in tree.items() {
            assert_eq!(tree.item_at(path), Some(item), "path {}", path);
        }
        assert!(tree.item_at(ItemPath::category(1, 0)).is_none());
        assert!(tree.item_at(ItemPath::typed(2, 0, 5, 0)).is_none());
    }

    #[test]
    fn test_items_mut_matches_shared_walk() {
        let mut tree = mixed_tree();
        let expected: Vec<ItemPath> = tree.items().map(|(_, p)| p).collect();
        let mut seen = Vec::new();
        for (item, path) in tree.items_mut() {
            item.name.push('!');
            seen.push(path);
        }
        assert_eq!(seen, expected);
        assert!(tree.items().all(|(item, _)| item.name.ends_with('!')));
    }

    #[test]
    fn test_options_walk_is_separate() {
        let mut tree = mixed_tree();
        tree.categories[2].subcategories[0].types[0].items[1]
            .options
            .push(ItemOption {
                name: "Copa".into(),
                price: Some(PricePair::new(None, "40")),
            });

        let options: Vec<String> = tree
            .options()
            .map(|(opt, path)| format!("{}={}", path, opt.name))
            .collect();
        assert_eq!(options, vec!["c2/s0/t0/i1/o0=Copa"]);
        assert_eq!(tree.item_count(), 8);

        for (opt, _) in tree.options_mut() {
            opt.price = None;
        }
        assert!(tree.options().all(|(opt, _)| opt.price.is_none()));
    }
}
