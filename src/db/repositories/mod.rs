mod activities;
mod habits;
