mod decision;
mod interaction;
mod movement;
