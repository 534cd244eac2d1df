// src/conversation.rs

use crate::api::LanguageModel;
use crate::chatbot::Chatbot;
use crate::constants::{MAX_PREVIOUS_QUESTIONS, POINTS_PER_QUESTION};
use crate::errors::{CareError, CareResult};
use crate::models::{Attachment, ChatContext, ConditionSet, Message};
use std::collections::VecDeque;
use uuid::Uuid;

/// The most recent questions, oldest first. Holds at most `capacity` entries.
#[derive(Debug, Clone)]
pub struct QuestionHistory {
    questions: VecDeque<String>,
    capacity: usize,
}

impl QuestionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            questions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, question: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.questions.len() == self.capacity {
            self.questions.pop_front();
        }
        self.questions.push_back(question.into());
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.questions.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn clear(&mut self) {
        self.questions.clear();
    }
}

impl Default for QuestionHistory {
    fn default() -> Self {
        Self::new(MAX_PREVIOUS_QUESTIONS)
    }
}

/// One chat with the assistant. Lives in memory only.
#[derive(Debug)]
pub struct ChatSession {
    pub id: Uuid,
    conditions: ConditionSet,
    surgery_type: Option<String>,
    messages: Vec<Message>,
    previous_questions: QuestionHistory,
    points: u32,
}

impl ChatSession {
    pub fn new(conditions: ConditionSet, surgery_type: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conditions,
            surgery_type,
            messages: Vec::new(),
            previous_questions: QuestionHistory::default(),
            points: 0,
        }
    }

    /// Opens the conversation with a greeting.
    pub async fn start<M: LanguageModel>(&mut self, chatbot: &Chatbot<M>) -> &Message {
        let intro = chatbot.generate_warm_intro(&self.conditions).await;
        self.messages.push(Message::assistant(intro));
        &self.messages[self.messages.len() - 1]
    }

    /// Runs one chat turn and returns the assistant's reply.
    ///
    /// The question is recorded in the history only after the reply arrives, so the
    /// prompt sees the questions asked before this one.
    pub async fn ask<M: LanguageModel>(
        &mut self,
        chatbot: &Chatbot<M>,
        question: &str,
        attachments: Vec<Attachment>,
    ) -> CareResult<&Message> {
        let question = question.trim();
        if question.is_empty() {
            return Err(CareError::EmptyQuestion);
        }

        let context = ChatContext {
            conditions: self.conditions.clone(),
            surgery_type: self.surgery_type.clone(),
            previous_questions: self.previous_questions.to_vec(),
            current_question: question.to_string(),
            attachments: attachments.clone(),
        };

        let reply = chatbot.generate_response(&context).await;

        self.messages.push(Message::user(question, attachments));
        self.messages.push(Message::assistant(reply));
        self.previous_questions.push(question);
        self.points += POINTS_PER_QUESTION;

        Ok(&self.messages[self.messages.len() - 1])
    }

    pub fn conditions(&self) -> &ConditionSet {
        &self.conditions
    }

    /// Changing conditions starts a fresh conversation.
    pub fn set_conditions(&mut self, conditions: ConditionSet) {
        self.conditions = conditions;
        self.clear();
    }

    pub fn surgery_type(&self) -> Option<&str> {
        self.surgery_type.as_deref()
    }

    pub fn set_surgery_type(&mut self, surgery_type: Option<String>) {
        self.surgery_type = surgery_type;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn previous_questions(&self) -> Vec<String> {
        self.previous_questions.to_vec()
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.previous_questions.clear();
    }
}
