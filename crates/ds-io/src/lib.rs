/// Image decode/encode collaborators for dotscreen.

pub mod codec;
