//! Editing of a tenant's rule lists.
//!
//! Rules are addressed by their 1-based position, as shown to users in
//! listings, or by their stable id. Every edit is a read-modify-write of the
//! owning tenant under the store lock, so concurrent edits never interleave.

use crate::error::RuleError;
use crate::pagination::{paginate, Page, PAGE_SIZE};
use hearth_common::{ChannelId, TenantId};
use hearth_config::{
    dedup_reactions, new_rule_id, AutoReplyRule, ChannelAutoRule, ConfigStore, DeliveryMode,
    MatchType, TenantConfig,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::info;

/// A rule kind stored in a tenant's configuration.
pub trait StoredRule: Clone + Send + Sync + 'static {
    /// Partial edit of this rule kind.
    type Patch;

    /// Human-readable kind, used in logs.
    const KIND: &'static str;

    /// The tenant's list of this kind.
    fn rules(config: &TenantConfig) -> &Vec<Self>;

    /// The tenant's list of this kind, mutably.
    fn rules_mut(config: &mut TenantConfig) -> &mut Vec<Self>;

    /// Stable id.
    fn id(&self) -> &str;

    /// Replaces the stable id.
    fn set_id(&mut self, id: String);

    /// Flips the enabled flag, returning the new state.
    fn toggle(&mut self) -> bool;

    /// Applies a partial edit.
    fn apply(&mut self, patch: Self::Patch);

    /// Rejects rules that could never fire.
    fn validate(&self) -> Result<(), RuleError>;
}

/// Fields to change on an auto-reply rule; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct AutoReplyPatch {
    pub trigger: Option<String>,
    pub reply: Option<String>,
    pub match_type: Option<MatchType>,
    pub mode: Option<DeliveryMode>,
    pub mention: Option<bool>,
    pub case_sensitive: Option<bool>,
}

/// Fields to change on a channel-auto rule; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct ChannelAutoPatch {
    pub channel_id: Option<ChannelId>,
    pub reply: Option<String>,
    pub reactions: Option<Vec<String>>,
    pub mention: Option<bool>,
}

impl StoredRule for AutoReplyRule {
    type Patch = AutoReplyPatch;

    const KIND: &'static str = "auto-reply";

    fn rules(config: &TenantConfig) -> &Vec<Self> {
        &config.auto_replies
    }

    fn rules_mut(config: &mut TenantConfig) -> &mut Vec<Self> {
        &mut config.auto_replies
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    fn apply(&mut self, patch: AutoReplyPatch) {
        if let Some(trigger) = patch.trigger {
            self.trigger = trigger;
        }
        if let Some(reply) = patch.reply {
            self.reply = reply;
        }
        if let Some(match_type) = patch.match_type {
            self.match_type = match_type;
        }
        if let Some(mode) = patch.mode {
            self.mode = mode;
        }
        if let Some(mention) = patch.mention {
            self.mention = mention;
        }
        if let Some(case_sensitive) = patch.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
    }

    fn validate(&self) -> Result<(), RuleError> {
        if self.trigger.trim().is_empty() {
            return Err(RuleError::Validation("The trigger cannot be empty".to_string()));
        }
        if self.reply.trim().is_empty() {
            return Err(RuleError::Validation("The reply cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl StoredRule for ChannelAutoRule {
    type Patch = ChannelAutoPatch;

    const KIND: &'static str = "channel-auto";

    fn rules(config: &TenantConfig) -> &Vec<Self> {
        &config.channel_auto
    }

    fn rules_mut(config: &mut TenantConfig) -> &mut Vec<Self> {
        &mut config.channel_auto
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    fn apply(&mut self, patch: ChannelAutoPatch) {
        if let Some(channel_id) = patch.channel_id {
            self.channel_id = Some(channel_id);
        }
        if let Some(reply) = patch.reply {
            self.reply = reply;
        }
        if let Some(reactions) = patch.reactions {
            self.reactions = reactions;
        }
        if let Some(mention) = patch.mention {
            self.mention = mention;
        }
        self.reactions = dedup_reactions(&self.reactions);
    }

    fn validate(&self) -> Result<(), RuleError> {
        if self.channel_id.is_none() {
            return Err(RuleError::Validation("A channel is required".to_string()));
        }
        if self.reply.trim().is_empty() && self.reactions.is_empty() {
            return Err(RuleError::Validation(
                "Give the rule a reply, at least one reaction, or both".to_string(),
            ));
        }
        Ok(())
    }
}

/// How a caller refers to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleRef {
    /// 1-based position in the list.
    Position(usize),
    /// Stable id.
    Id(String),
}

impl RuleRef {
    fn locate<R: StoredRule>(&self, rules: &[R]) -> Result<usize, RuleError> {
        match self {
            Self::Position(index) if (1..=rules.len()).contains(index) => Ok(index - 1),
            Self::Position(index) => Err(RuleError::IndexOutOfRange {
                index: *index,
                len: rules.len(),
            }),
            Self::Id(id) => rules
                .iter()
                .position(|rule| rule.id() == id)
                .ok_or_else(|| RuleError::UnknownId { id: id.clone() }),
        }
    }
}

/// Auto-reply rule editing.
pub type AutoReplyBook = RuleBook<AutoReplyRule>;

/// Channel-auto rule editing.
pub type ChannelAutoBook = RuleBook<ChannelAutoRule>;

/// Lists and edits one kind of rule for any tenant.
#[derive(Debug, Clone)]
pub struct RuleBook<R> {
    store: Arc<ConfigStore>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: StoredRule> RuleBook<R> {
    /// Creates a book editing rules held in `store`.
    pub const fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// One page of the tenant's rules; `page` is 0-based and clamped.
    pub fn list(&self, tenant: TenantId, page: usize) -> Result<Page<R>, RuleError> {
        let config = self.store.get_tenant(tenant)?;
        Ok(paginate(R::rules(&config), page, PAGE_SIZE))
    }

    /// The rule at `at`.
    pub fn get(&self, tenant: TenantId, at: &RuleRef) -> Result<R, RuleError> {
        let config = self.store.get_tenant(tenant)?;
        let rules = R::rules(&config);
        let index = at.locate(rules)?;
        Ok(rules[index].clone())
    }

    /// Appends a rule, assigning an id if it has none. Returns its position.
    pub fn add(&self, tenant: TenantId, mut rule: R) -> Result<(usize, R), RuleError> {
        if rule.id().trim().is_empty() {
            rule.set_id(new_rule_id());
        }
        rule.validate()?;

        self.store.modify_tenant(tenant, |config| {
            let rules = R::rules_mut(config);
            rules.push(rule.clone());
            info!(tenant = %tenant, kind = R::KIND, rule = rule.id(), "Rule added");
            Ok((rules.len(), rule))
        })
    }

    /// Applies `patch` to the rule at 1-based `index`.
    pub fn edit(&self, tenant: TenantId, index: usize, patch: R::Patch) -> Result<R, RuleError> {
        self.edit_at(tenant, &RuleRef::Position(index), patch)
    }

    /// Applies `patch` to the rule with `id`.
    pub fn edit_by_id(&self, tenant: TenantId, id: &str, patch: R::Patch) -> Result<R, RuleError> {
        self.edit_at(tenant, &RuleRef::Id(id.to_string()), patch)
    }

    /// Removes the rule at 1-based `index`, returning it.
    pub fn remove(&self, tenant: TenantId, index: usize) -> Result<R, RuleError> {
        self.remove_at(tenant, &RuleRef::Position(index))
    }

    /// Removes the rule with `id`, returning it.
    pub fn remove_by_id(&self, tenant: TenantId, id: &str) -> Result<R, RuleError> {
        self.remove_at(tenant, &RuleRef::Id(id.to_string()))
    }

    /// Flips the rule at 1-based `index` between enabled and disabled.
    pub fn toggle(&self, tenant: TenantId, index: usize) -> Result<R, RuleError> {
        self.toggle_at(tenant, &RuleRef::Position(index))
    }

    /// Flips the rule with `id` between enabled and disabled.
    pub fn toggle_by_id(&self, tenant: TenantId, id: &str) -> Result<R, RuleError> {
        self.toggle_at(tenant, &RuleRef::Id(id.to_string()))
    }

    fn edit_at(&self, tenant: TenantId, at: &RuleRef, patch: R::Patch) -> Result<R, RuleError> {
        self.store.modify_tenant(tenant, |config| {
            let rules = R::rules_mut(config);
            let index = at.locate(rules)?;

            let mut updated = rules[index].clone();
            updated.apply(patch);
            updated.validate()?;
            rules[index] = updated.clone();

            info!(tenant = %tenant, kind = R::KIND, rule = updated.id(), "Rule edited");
            Ok(updated)
        })
    }

    fn remove_at(&self, tenant: TenantId, at: &RuleRef) -> Result<R, RuleError> {
        self.store.modify_tenant(tenant, |config| {
            let rules = R::rules_mut(config);
            let index = at.locate(rules)?;
            let removed = rules.remove(index);
            info!(tenant = %tenant, kind = R::KIND, rule = removed.id(), "Rule removed");
            Ok(removed)
        })
    }

    fn toggle_at(&self, tenant: TenantId, at: &RuleRef) -> Result<R, RuleError> {
        self.store.modify_tenant(tenant, |config| {
            let rules = R::rules_mut(config);
            let index = at.locate(rules)?;
            let enabled = rules[index].toggle();
            info!(tenant = %tenant, kind = R::KIND, rule = rules[index].id(), enabled, "Rule toggled");
            Ok(rules[index].clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_positions() {
        let rules = vec![AutoReplyRule::default(), AutoReplyRule::default()];
        assert_eq!(RuleRef::Position(1).locate(&rules).unwrap(), 0);
        assert_eq!(RuleRef::Position(2).locate(&rules).unwrap(), 1);
        assert!(matches!(
            RuleRef::Position(0).locate(&rules),
            Err(RuleError::IndexOutOfRange { index: 0, len: 2 })
        ));
        assert!(matches!(
            RuleRef::Position(3).locate(&rules),
            Err(RuleError::IndexOutOfRange { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_channel_rule_needs_reply_or_reaction() {
        let mut rule = ChannelAutoRule {
            channel_id: Some(ChannelId(1)),
            ..ChannelAutoRule::default()
        };
        assert!(rule.validate().is_err());

        rule.apply(ChannelAutoPatch {
            reactions: Some(vec!["👍".to_string(), "👍".to_string()]),
            ..ChannelAutoPatch::default()
        });
        assert!(rule.validate().is_ok());
        assert_eq!(rule.reactions, vec!["👍"]);
    }

    #[test]
    fn test_auto_reply_patch_keeps_unset_fields() {
        let mut rule = AutoReplyRule {
            trigger: "hi".to_string(),
            reply: "hello".to_string(),
            ..AutoReplyRule::default()
        };
        rule.apply(AutoReplyPatch {
            match_type: Some(MatchType::Exact),
            ..AutoReplyPatch::default()
        });
        assert_eq!(rule.trigger, "hi");
        assert_eq!(rule.match_type, MatchType::Exact);
        assert!(!rule.toggle());
    }
}
