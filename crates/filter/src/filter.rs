use crate::Log;
use itertools::Itertools;
use std::collections::HashSet;
use voltic_primitives::{Address, BlockNumber, Bloom, BloomInput, B256};

/// What a single topic position accepts.
///
/// This is the `T | null | T[]` pattern of the JSON-RPC filter API as a
/// tagged union: `null` is [`TopicMatcher::Any`], a scalar is
/// [`TopicMatcher::Exact`], and an array is [`TopicMatcher::OneOf`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "TopicMatcherRepr", into = "TopicMatcherRepr")]
pub enum TopicMatcher {
    /// Any topic matches; the position is unconstrained.
    #[default]
    Any,
    /// Exactly this topic matches.
    Exact(B256),
    /// Any topic in the set matches.
    OneOf(HashSet<B256>),
}

/// The JSON wire shape of a topic entry.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum TopicMatcherRepr {
    Single(Option<B256>),
    Many(Vec<B256>),
}

impl From<TopicMatcherRepr> for TopicMatcher {
    fn from(repr: TopicMatcherRepr) -> Self {
        match repr {
            TopicMatcherRepr::Single(None) => Self::Any,
            TopicMatcherRepr::Single(Some(topic)) => Self::Exact(topic),
            TopicMatcherRepr::Many(topics) => {
                Self::OneOf(topics.into_iter().collect()).normalized()
            }
        }
    }
}

impl From<TopicMatcher> for TopicMatcherRepr {
    fn from(matcher: TopicMatcher) -> Self {
        match matcher {
            TopicMatcher::Any => Self::Single(None),
            TopicMatcher::Exact(topic) => Self::Single(Some(topic)),
            TopicMatcher::OneOf(topics) => Self::Many(topics.into_iter().collect()),
        }
    }
}

impl TopicMatcher {
    /// Collapses degenerate set forms: an empty set matches nothing a
    /// topic could be, so it stays `OneOf`; a one-element set becomes
    /// [`Self::Exact`].
    pub fn normalized(self) -> Self {
        match self {
            Self::OneOf(topics) if topics.len() == 1 => {
                Self::Exact(topics.into_iter().next().expect("len checked"))
            }
            other => other,
        }
    }

    /// True if the matcher is unconstrained.
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// True if `topic` satisfies this position.
    pub fn matches(&self, topic: &B256) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == topic,
            Self::OneOf(expected) => expected.contains(topic),
        }
    }

    /// The union of the blooms of the accepted topics, or `None` when
    /// unconstrained. A block bloom that does not contain this matcher's
    /// bloom bits for any accepted topic cannot contain a matching log.
    pub fn bloom(&self) -> Option<Vec<Bloom>> {
        match self {
            Self::Any => None,
            Self::Exact(topic) => Some(vec![Bloom::from(BloomInput::Raw(topic.as_slice()))]),
            Self::OneOf(topics) => Some(
                topics
                    .iter()
                    .map(|topic| Bloom::from(BloomInput::Raw(topic.as_slice())))
                    .collect(),
            ),
        }
    }

    /// True if `bloom` could contain a log whose topic satisfies this
    /// position.
    pub fn matches_bloom(&self, bloom: &Bloom) -> bool {
        match self.bloom() {
            None => true,
            Some(candidates) => {
                candidates.iter().any(|candidate| bloom.contains_bloom(candidate))
            }
        }
    }
}

impl From<B256> for TopicMatcher {
    fn from(topic: B256) -> Self {
        Self::Exact(topic)
    }
}

impl From<Option<B256>> for TopicMatcher {
    fn from(topic: Option<B256>) -> Self {
        topic.map_or(Self::Any, Self::Exact)
    }
}

impl FromIterator<B256> for TopicMatcher {
    fn from_iter<T: IntoIterator<Item = B256>>(iter: T) -> Self {
        Self::OneOf(iter.into_iter().collect()).normalized()
    }
}

/// The addresses a filter accepts: empty means any.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AddressFilter(pub HashSet<Address>);

impl AddressFilter {
    /// True if the filter is unconstrained.
    pub fn is_any(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `address` satisfies the filter.
    pub fn matches(&self, address: &Address) -> bool {
        self.0.is_empty() || self.0.contains(address)
    }

    /// True if `bloom` could contain a log from an accepted address.
    pub fn matches_bloom(&self, bloom: &Bloom) -> bool {
        self.0.is_empty() || self.0.iter().any(|address| bloom.contains_address(*address))
    }
}

impl From<Address> for AddressFilter {
    fn from(address: Address) -> Self {
        Self(core::iter::once(address).collect())
    }
}

impl FromIterator<Address> for AddressFilter {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The block range a filter covers; either bound may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterBlockRange {
    /// The first block covered, inclusive.
    #[serde(default)]
    pub from_block: Option<BlockNumber>,
    /// The last block covered, inclusive.
    #[serde(default)]
    pub to_block: Option<BlockNumber>,
}

impl FilterBlockRange {
    /// True if `number` falls inside the range.
    pub fn contains(&self, number: BlockNumber) -> bool {
        self.from_block.is_none_or(|from| number >= from)
            && self.to_block.is_none_or(|to| number <= to)
    }
}

/// An `eth_getLogs`-style log filter.
///
/// A log matches when its address is accepted, every topic position's
/// matcher is satisfied by the topic at that position, and its block
/// number falls in the range. A filter with more positions than the log
/// has topics cannot match.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Accepted emitting addresses; empty accepts all.
    #[serde(default, rename = "address")]
    pub addresses: AddressFilter,
    /// Positional topic constraints, outermost first.
    #[serde(default)]
    pub topics: Vec<TopicMatcher>,
    /// The covered block range.
    #[serde(flatten)]
    pub range: FilterBlockRange,
}

impl Filter {
    /// A filter accepting everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one emitting address.
    #[must_use]
    pub fn address(mut self, address: Address) -> Self {
        self.addresses = address.into();
        self
    }

    /// Sets the matcher for the event-signature position (`topics[0]`).
    #[must_use]
    pub fn event_signature(mut self, matcher: impl Into<TopicMatcher>) -> Self {
        if self.topics.is_empty() {
            self.topics.push(TopicMatcher::Any);
        }
        self.topics[0] = matcher.into();
        self
    }

    /// Sets the matcher at topic position `index` (0..=3), padding the
    /// gap with [`TopicMatcher::Any`].
    #[must_use]
    pub fn topic(mut self, index: usize, matcher: impl Into<TopicMatcher>) -> Self {
        debug_assert!(index < 4, "logs carry at most four topics");
        while self.topics.len() <= index {
            self.topics.push(TopicMatcher::Any);
        }
        self.topics[index] = matcher.into();
        self
    }

    /// Restricts the block range.
    #[must_use]
    pub fn blocks(mut self, from: BlockNumber, to: BlockNumber) -> Self {
        self.range = FilterBlockRange { from_block: Some(from), to_block: Some(to) };
        self
    }

    /// True if the topic constraints are satisfied by `topics`.
    ///
    /// Each filter position requires the log to have a topic there, even
    /// an [`TopicMatcher::Any`] position; positions beyond the filter's
    /// length are unconstrained.
    pub fn matches_topics(&self, topics: &[B256]) -> bool {
        self.topics.iter().zip_longest(topics).all(|pair| match pair {
            itertools::EitherOrBoth::Both(matcher, topic) => matcher.matches(topic),
            // the log ran out of topics while filter positions remain
            itertools::EitherOrBoth::Left(_) => false,
            // surplus log topics are unconstrained
            itertools::EitherOrBoth::Right(_) => true,
        })
    }

    /// True if the address constraint is satisfied.
    pub fn matches_address(&self, address: &Address) -> bool {
        self.addresses.matches(address)
    }

    /// Full per-log evaluation.
    pub fn matches(&self, log: &Log) -> bool {
        if !self.matches_address(&log.address()) {
            return false;
        }
        if !self.matches_topics(log.topics()) {
            return false;
        }
        match log.block_number {
            Some(number) => self.range.contains(number),
            // a pending log has no number; only an unbounded range takes it
            None => self.range == FilterBlockRange::default(),
        }
    }

    /// Bloom-level pre-filter: true if `bloom` could contain a matching
    /// log. A `false` is definitive and lets callers skip decoding the
    /// block's receipts; a `true` must be confirmed log by log.
    pub fn matches_bloom(&self, bloom: &Bloom) -> bool {
        self.addresses.matches_bloom(bloom)
            && self.topics.iter().all(|matcher| matcher.matches_bloom(bloom))
    }
}

/// Applies `filter` to an in-memory log set.
pub fn filter_logs<'a>(logs: impl IntoIterator<Item = &'a Log>, filter: &Filter) -> Vec<Log> {
    logs.into_iter().filter(|log| filter.matches(log)).cloned().collect()
}

/// Orders logs by `(block_number, log_index)` ascending. The sort is
/// stable: logs without context keep their relative order, before any
/// numbered log.
pub fn sort_logs(logs: &mut [Log]) {
    logs.sort_by_key(|log| (log.block_number, log.log_index));
}
