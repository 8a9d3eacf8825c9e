//! Session controller: routes each raw input line.
//!
//! One line at a time: dropped if output is still animating, delivered
//! verbatim to the active modal block if one exists, otherwise parsed and
//! dispatched through the command resolver. The outer read loop (in the
//! binary) awaits the pending flush handle after each line before prompting
//! again.

use crate::parse::parse_line;
use crate::resolve::{self, CommandRegistry, Resolution};
use crate::scheduler::Scheduler;
use crate::stack::InputStack;
use crate::store::CharacterStore;

pub struct Session {
    pub out: Scheduler,
    pub stack: InputStack,
    pub store: CharacterStore,
    registry: CommandRegistry,
    exit_requested: bool,
}

impl Session {
    /// A session with the standard command catalog.
    pub fn new(out: Scheduler, store: CharacterStore) -> Self {
        Self {
            out,
            stack: InputStack::new(),
            store,
            registry: CommandRegistry::standard(),
            exit_requested: false,
        }
    }

    /// Route one raw line.
    pub fn handle_line(&mut self, line: &str) {
        // The terminal is non-reentrant while text is animating: input
        // arriving mid-drain is dropped, not queued.
        if self.out.pending().is_some() {
            return;
        }

        if self.stack.is_active() {
            self.deliver_to_block(line);
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        let parsed = parse_line(trimmed);
        match self.registry.resolve(&parsed.name, &self.store) {
            Resolution::Command(cmd) => {
                if parsed.flags.wants_help() {
                    self.out.write(cmd.usage.trim());
                    return;
                }
                (cmd.run)(self, &parsed.flags, &parsed.positional);
            }
            Resolution::Field(field) => {
                resolve::run_field(self, &field, &parsed.positional);
            }
            Resolution::Unknown => {
                self.out.write(&format!("Unknown command: {}", parsed.name));
            }
        }
    }

    fn deliver_to_block(&mut self, line: &str) {
        let Some(id) = self.stack.active_id() else {
            return;
        };
        let Some(mut handler) = self.stack.take_handler(id) else {
            return;
        };
        handler(self, line);
        // If the handler exited its block, the put-back finds nothing.
        self.stack.put_handler_back(id, handler);
    }

    /// The prompt label to show before the next line.
    pub fn prompt_label(&self) -> &str {
        self.stack.active_label()
    }

    /// Candidate names for tab completion: commands merged with public
    /// field names.
    pub fn completion_names(&self) -> Vec<String> {
        self.registry.completion_names(&self.store)
    }

    /// Ask the read loop to terminate after the current line.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}
