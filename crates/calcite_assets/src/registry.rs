//! The dense block state registry produced by the asset loader.

use std::collections::HashMap;

use crate::model::BlockModel;

/// The namespaced block name shared by every state of one block type.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct BlockStateInfo {
    pub name: String,
}

impl BlockStateInfo {
    /// The name with its `minecraft:` namespace stripped, as blockstate
    /// file stems use it.
    pub fn path(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, path)) => path,
            None => &self.name,
        }
    }
}

/// A contiguous run of state ids belonging to one block name.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StateIdRange {
    pub base: u32,
    pub count: u32,
}

/// One block state: its resolved model plus the single runtime property
/// the client retains (fluid level).
#[derive(Clone, Default, Debug)]
pub struct BlockState {
    pub id: u32,
    /// Index into [`BlockRegistry::infos`]; states never point at each
    /// other directly.
    pub info: u32,
    pub model: BlockModel,
    pub leveled: bool,
    pub level: u8,
}

/// All block states indexed densely by state id.
#[derive(Default, Debug)]
pub struct BlockRegistry {
    pub states: Vec<BlockState>,
    pub infos: Vec<BlockStateInfo>,
    /// One serialized `k=v,k=v` property string per state, `waterlogged`
    /// omitted.
    pub properties: Vec<String>,
    name_to_range: HashMap<String, StateIdRange>,
    default_mask: Vec<u64>,
}

impl BlockRegistry {
    pub fn with_state_count(state_count: usize) -> Self {
        Self {
            states: (0..state_count)
                .map(|id| BlockState {
                    id: id as u32,
                    ..Default::default()
                })
                .collect(),
            infos: Vec::new(),
            properties: vec![String::new(); state_count],
            name_to_range: HashMap::new(),
            default_mask: vec![0; state_count.div_ceil(64)],
        }
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn state(&self, id: u32) -> Option<&BlockState> {
        self.states.get(id as usize)
    }

    pub fn info(&self, state: &BlockState) -> &BlockStateInfo {
        &self.infos[state.info as usize]
    }

    pub fn name_of(&self, id: u32) -> Option<&str> {
        let state = self.state(id)?;
        Some(&self.infos[state.info as usize].name)
    }

    pub fn range_for(&self, name: &str) -> Option<StateIdRange> {
        self.name_to_range.get(name).copied()
    }

    pub(crate) fn insert_range(&mut self, name: &str, range: StateIdRange) {
        self.name_to_range.insert(name.to_owned(), range);
    }

    pub fn mark_default(&mut self, id: u32) {
        self.default_mask[id as usize / 64] |= 1 << (id % 64);
    }

    pub fn is_default(&self, id: u32) -> bool {
        self.default_mask[id as usize / 64] >> (id % 64) & 1 == 1
    }

    /// The default state id for a block name.
    pub fn default_state(&self, name: &str) -> Option<u32> {
        let range = self.range_for(name)?;
        (range.base..range.base + range.count).find(|&id| self.is_default(id))
    }
}

/// Whether a state's serialized property string satisfies a blockstate
/// selector: every `k=v` pair of the selector must appear in the state.
/// The empty selector matches everything.
pub fn has_property_set(state_properties: &str, selector: &str) -> bool {
    selector
        .split(',')
        .filter(|pair| !pair.is_empty())
        .all(|pair| {
            state_properties
                .split(',')
                .any(|state_pair| state_pair == pair)
        })
}
