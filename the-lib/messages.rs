use std::collections::VecDeque;

pub const DEFAULT_HISTORY_LIMIT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
  Info,
  Warning,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
  pub id:     u64,
  pub level:  MessageLevel,
  pub source: Option<String>,
  pub text:   String,
}

/// User-facing status messages: one active message plus a bounded backlog.
#[derive(Debug, Clone)]
pub struct MessageCenter {
  active:          Option<Message>,
  history:         VecDeque<Message>,
  next_message_id: u64,
  history_limit:   usize,
}

impl Default for MessageCenter {
  fn default() -> Self {
    Self::with_limit(DEFAULT_HISTORY_LIMIT)
  }
}

impl MessageCenter {
  pub fn with_limit(history_limit: usize) -> Self {
    Self {
      active:          None,
      history:         VecDeque::new(),
      next_message_id: 1,
      history_limit:   history_limit.max(1),
    }
  }

  pub fn active(&self) -> Option<&Message> {
    self.active.as_ref()
  }

  pub fn history_len(&self) -> usize {
    self.history.len()
  }

  pub fn history(&self) -> impl Iterator<Item = &Message> {
    self.history.iter()
  }

  pub fn publish(
    &mut self,
    level: MessageLevel,
    source: Option<String>,
    text: impl Into<String>,
  ) -> Message {
    let message = Message {
      id: self.next_message_id,
      level,
      source,
      text: text.into(),
    };
    self.next_message_id = self.next_message_id.saturating_add(1);

    match message.level {
      MessageLevel::Error => log::error!("{}", message.text),
      MessageLevel::Warning => log::warn!("{}", message.text),
      MessageLevel::Info => log::info!("{}", message.text),
    }

    self.active = Some(message.clone());
    self.history.push_back(message.clone());
    while self.history.len() > self.history_limit {
      self.history.pop_front();
    }
    message
  }

  pub fn info(&mut self, source: Option<String>, text: impl Into<String>) -> Message {
    self.publish(MessageLevel::Info, source, text)
  }

  pub fn warning(&mut self, source: Option<String>, text: impl Into<String>) -> Message {
    self.publish(MessageLevel::Warning, source, text)
  }

  pub fn error(&mut self, source: Option<String>, text: impl Into<String>) -> Message {
    self.publish(MessageLevel::Error, source, text)
  }

  pub fn dismiss_active(&mut self) -> Option<Message> {
    self.active.take()
  }

  pub fn clear(&mut self) {
    self.active = None;
    self.history.clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn publish_sets_active() {
    let mut center = MessageCenter::default();
    let message = center.publish(MessageLevel::Error, Some("save".to_string()), "boom");
    assert_eq!(center.active(), Some(&message));
    assert_eq!(center.history_len(), 1);
    assert_eq!(message.id, 1);
  }

  #[test]
  fn newer_message_replaces_active() {
    let mut center = MessageCenter::default();
    center.info(None, "a");
    let b = center.warning(None, "b");
    assert_eq!(center.active(), Some(&b));
  }

  #[test]
  fn history_limit_is_enforced() {
    let mut center = MessageCenter::with_limit(2);
    center.info(None, "a");
    center.info(None, "b");
    center.info(None, "c");
    assert_eq!(center.history_len(), 2);
    let texts: Vec<_> = center.history().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["b", "c"]);
  }

  #[test]
  fn dismiss_keeps_history() {
    let mut center = MessageCenter::default();
    center.info(None, "saved");
    assert!(center.dismiss_active().is_some());
    assert!(center.active().is_none());
    assert_eq!(center.history_len(), 1);
    center.clear();
    assert_eq!(center.history_len(), 0);
  }
}
