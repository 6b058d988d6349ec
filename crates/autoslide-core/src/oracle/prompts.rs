//! Question wording sent to the vision model.

pub const DISTANCE: &str = "\
You are helping someone who cannot see the screen complete a slider puzzle.
The image shows a slider handle (a white circle with a vertical bar in its middle) and an empty dark slot in the puzzle area.
Measure the horizontal distance in pixels from the centre line of the handle to the horizontal centre of the slot.
- Movement is horizontal only and always to the right.
- If the handle is already aligned with the slot, answer 0.
- Never answer with a negative number.
- If the distance exceeds 260, answer 260.
Answer with a single integer and nothing else, for example: 134";

pub const DIRECTION: &str = "\
You analyse screenshots for UI automation. The image shows a slider puzzle after a first attempt: \
the puzzle piece was dragged in from the left and should fit into the darker empty slot. \
If the piece is LEFT of the slot, answer with the single character '+'. \
If the piece is RIGHT of the slot, answer with the single character '-'. \
Your entire answer must be either '+' or '-'.";

pub const BEST_FIT_SYSTEM: &str = "You are an expert at analyzing puzzle captcha images.";

pub const BEST_FIT: &str = "\
The following images show the same slider puzzle with the piece at slightly different positions.
Pick the image where the piece sits flush in its slot.
Any image showing a dark gap between the piece and the slot edges is disqualified.
Among the remaining images, prefer the most precise fit. Ignore sliders, buttons and other controls.
Answer with only the zero-based index of the best image (for example 0, 1 or 2).";

pub const SUBJECT: &str = "\
Read the blue instruction bar in the image and name the object the user is asked to select. \
For 'Select all squares with motorcycles' the object is 'motorcycles'. \
Answer with only the object name in lowercase. If the instruction says to click skip, answer 'skip'.";

/// Question asking whether a tile shows `subject`.
pub fn tile_contains(subject: &str) -> String {
    format!(
        "Does this image clearly contain a '{subject}' or a recognizable part of a '{subject}'? \
         Answer only 'true' if you are certain. If you are unsure, answer only 'false'."
    )
}
